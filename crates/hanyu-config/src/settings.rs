use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// Persisted user settings, shared by the CLI and the background service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_key: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("API key must not be empty")]
    EmptyApiKey,
}

/// JSON key-value file holding [`PluginSettings`]
pub struct SettingsStore {
    path: PathBuf,
    settings: PluginSettings,
}

impl SettingsStore {
    /// Open the store, creating it with defaults on first run
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();

        let settings = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            tracing::info!("No settings at {}, writing defaults", path.display());
            let settings = PluginSettings::default();
            write_settings(&path, &settings)?;
            settings
        };

        Ok(Self { path, settings })
    }

    /// Re-read the file so changes made by another process are picked up
    pub fn reload(&mut self) -> Result<&PluginSettings, SettingsError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            self.settings = serde_json::from_str(&data)?;
        }
        Ok(&self.settings)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    pub fn enabled(&self) -> bool {
        self.settings.enabled
    }

    /// API key, treating a blank value as unset
    pub fn api_key(&self) -> Option<&str> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.commit(PluginSettings {
            enabled,
            ..self.settings.clone()
        })
    }

    /// Flip the enabled flag and return the new value
    pub fn toggle(&mut self) -> Result<bool, SettingsError> {
        let enabled = !self.settings.enabled;
        self.set_enabled(enabled)?;
        Ok(enabled)
    }

    pub fn set_api_key(&mut self, api_key: &str) -> Result<(), SettingsError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(SettingsError::EmptyApiKey);
        }
        self.commit(PluginSettings {
            api_key: Some(api_key.to_string()),
            ..self.settings.clone()
        })
    }

    /// Memory only changes once `next` is on disk
    fn commit(&mut self, next: PluginSettings) -> Result<(), SettingsError> {
        write_settings(&self.path, &next)?;
        self.settings = next;
        Ok(())
    }
}

fn write_settings(path: &Path, settings: &PluginSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(settings)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("hanyu-settings-{}", uuid::Uuid::new_v4()))
            .join("settings.json")
    }

    #[test]
    fn first_open_writes_enabled_defaults() {
        let path = temp_path();
        let store = SettingsStore::open(&path).unwrap();
        assert!(store.enabled());
        assert!(store.api_key().is_none());
        assert!(path.exists());
    }

    #[test]
    fn api_key_and_toggle_persist() {
        let path = temp_path();
        let mut store = SettingsStore::open(&path).unwrap();
        store.set_api_key("  sk-test  ").unwrap();
        assert!(!store.toggle().unwrap());

        let reopened = SettingsStore::open(&path).unwrap();
        assert_eq!(reopened.api_key(), Some("sk-test"));
        assert!(!reopened.enabled());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"apiKey\""));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let mut store = SettingsStore::open(temp_path()).unwrap();
        assert!(matches!(
            store.set_api_key("   "),
            Err(SettingsError::EmptyApiKey)
        ));
    }

    #[test]
    fn failed_write_keeps_previous_values() {
        let path = temp_path();
        let mut store = SettingsStore::open(&path).unwrap();
        store.set_api_key("sk-old").unwrap();

        // A directory in place of the file makes every write fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(store.set_api_key("sk-new").is_err());
        assert_eq!(store.api_key(), Some("sk-old"));
        assert!(store.toggle().is_err());
        assert!(store.enabled());
    }
}
