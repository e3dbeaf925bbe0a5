use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use hanyu_config::Config;
use serde::{Deserialize, Serialize};

/// Load the default config shipped in the repo
fn load_repo_default_config() -> anyhow::Result<Config> {
    let path = Path::new("config.json");
    if !path.exists() {
        tracing::info!("No repo config.json, using built-in defaults");
        return Ok(Config::new());
    }

    tracing::info!("Loading repo default config...");
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

/// Platform config folder, e.g. `~/.config/hanyu`
pub fn hanyu_root() -> anyhow::Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "Hanyu").context("No home directory to store profiles in")?;
    Ok(dirs.config_dir().to_path_buf())
}

fn profiles_dir() -> anyhow::Result<PathBuf> {
    Ok(hanyu_root()?.join("profiles"))
}

/// Default location of the plugin settings store
pub fn settings_path() -> anyhow::Result<PathBuf> {
    Ok(hanyu_root()?.join("settings.json"))
}

/// Where written pronunciations go
pub fn audio_dir() -> anyhow::Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "Hanyu").context("No home directory for audio output")?;
    Ok(dirs.cache_dir().join("audio"))
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Initialize user config folders and main profile if missing
pub fn init_user_config() -> anyhow::Result<()> {
    let profiles = profiles_dir()?;
    fs::create_dir_all(&profiles)?;

    let main_profile = profiles.join("main.json");

    if !main_profile.exists() {
        let profile = Profile {
            name: "main".into(),
            value: load_repo_default_config()?,
        };
        fs::write(&main_profile, serde_json::to_string_pretty(&profile)?)?;
        tracing::info!("Created main profile at {}", main_profile.display());
    }

    Ok(())
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("Invalid profile {}", path.display()))?;
    Ok(profile.value)
}

/// Load a user profile by name, defaulting to main if name not found
pub fn load_user_profile(name: &str) -> anyhow::Result<Config> {
    let profiles = profiles_dir()?;
    let profile_file = profiles.join(format!("{name}.json"));

    if profile_file.exists() {
        return read_profile(&profile_file);
    }

    tracing::warn!("Profile {name} not found, falling back to main profile or repo default");
    let main_file = profiles.join("main.json");
    if main_file.exists() {
        read_profile(&main_file)
    } else {
        load_repo_default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_file_round_trips_partial_config() {
        let dir = std::env::temp_dir().join(format!("hanyu-profile-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("reading.json");
        fs::write(
            &path,
            r#"{"name":"reading","value":{"popup":{"rows_per_page":3}}}"#,
        )
        .unwrap();

        let config = read_profile(&path).unwrap();
        assert_eq!(config.popup.rows_per_page, 3);
        assert_eq!(config.popup.max_chars, 150);
    }

    #[test]
    fn broken_profile_names_the_file() {
        let dir = std::env::temp_dir().join(format!("hanyu-profile-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        fs::write(&path, "{").unwrap();

        let error = read_profile(&path).unwrap_err();
        assert!(error.to_string().contains("broken.json"));
    }
}
