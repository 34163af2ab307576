use std::{env, fs, io, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::osu::API_URL;

/// Environment variable the api key is read from when a profile doesn't set one
pub const API_KEY_VAR: &str = "OSU_API_KEY";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not read settings: {0}")]
    Io(#[from] io::Error),
    #[error("Could not parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No api key configured, set {} or add api_key to the profile", API_KEY_VAR)]
    MissingKey,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    API_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Settings {
    /// Loads `./profiles/{profile}.json`
    pub fn from_profile(profile: &str) -> Result<Settings, SettingsError> {
        Settings::from_path(format!("./profiles/{}.json", profile))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
        let file_content = fs::read_to_string(path)?;
        let settings = serde_json::from_str::<Settings>(&file_content)?;
        Ok(settings)
    }

    /// Key from the profile, falling back to the environment
    pub fn api_key(&self) -> Result<String, SettingsError> {
        match &self.api_key {
            Some(key) if !key.is_empty() => Ok(key.clone()),
            _ => env::var(API_KEY_VAR)
                .ok()
                .filter(|key| !key.is_empty())
                .ok_or(SettingsError::MissingKey),
        }
    }
}
