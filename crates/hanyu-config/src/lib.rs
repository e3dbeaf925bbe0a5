use std::env;

use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
use self::network::NetworkConfig;
use self::popup::PopupConfig;
use self::translator::TranslatorConfig;

pub mod dictionary;
pub mod network;
pub mod popup;
pub mod settings;
pub mod translator;

pub use settings::{PluginSettings, SettingsError, SettingsStore};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub popup: PopupConfig,
    pub translator: TranslatorConfig,
    pub dictionary: DictionaryConfig,

    /// Text source poll interval
    pub delta_time: u64,
    /// Listen to the page bridge websocket, if false use clipboard watcher
    pub listen_to_ws: bool,
}

impl Config {
    pub fn new() -> Self {
        let delta_time = env::var("DELTA_TIME_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(500); // 500ms default

        let listen_to_ws = env::var("LISTEN_TO_WS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);

        Config {
            network: NetworkConfig::new(),
            popup: PopupConfig::default(),
            translator: TranslatorConfig::new(),
            dictionary: DictionaryConfig::default(),

            delta_time,
            listen_to_ws,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_profile_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"popup":{"max_chars":80},"listen_to_ws":true}"#).unwrap();
        assert_eq!(config.popup.max_chars, 80);
        assert_eq!(config.popup.min_items_per_page, 3);
        assert_eq!(config.popup.rows_per_page, 2);
        assert!(config.listen_to_ws);
        assert_eq!(config.translator.translate_model, "gpt-4o");
    }
}
