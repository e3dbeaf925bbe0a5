use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Load the embedded character dictionary
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Extra line-delimited JSON files merged over the embedded data. The
    /// embedded data is only a sample; point this at a full `dictionary.txt`
    #[serde(default)]
    pub additional_paths: Vec<String>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            additional_paths: vec![],
        }
    }
}
