mod background_tests;

use std::path::PathBuf;
use std::sync::Arc;

use hanyu_config::{Config, SettingsStore};
use hanyu_core::state::AppState;

fn temp_settings() -> PathBuf {
    std::env::temp_dir()
        .join(format!("hanyu-app-{}", uuid::Uuid::new_v4()))
        .join("settings.json")
}

/// State with a fresh settings file and no API key
fn state() -> Arc<AppState> {
    let settings = SettingsStore::open(temp_settings()).unwrap();
    Arc::new(AppState::new(Config::default(), settings))
}
