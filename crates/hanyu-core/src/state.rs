use std::sync::Arc;

use hanyu_config::{Config, SettingsStore};
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub settings: RwLock<SettingsStore>,
}

impl AppState {
    pub fn new(config: Config, settings: SettingsStore) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            settings: RwLock::new(settings),
        }
    }
}
