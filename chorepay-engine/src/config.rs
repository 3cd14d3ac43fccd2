use chrono::NaiveDate;
use serde::Deserialize;
use std::{env, fs, path::Path};

use chorepay_shared::proof;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub parent: ParentSeed,
    #[serde(default)]
    pub children: Vec<ChildSeed>,
    /// Threshold handed to the photo-proof validator at submission time.
    #[serde(default = "default_proof_max_age_minutes")]
    pub proof_max_age_minutes: i64,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentSeed {
    pub name: String,
    #[serde(default = "default_parent_avatar")]
    pub avatar: String,
    pub pin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChildSeed {
    pub name: String,
    pub avatar: String,
    pub iban: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

fn default_proof_max_age_minutes() -> i64 {
    proof::DEFAULT_MAX_AGE_MINUTES
}

fn default_parent_avatar() -> String {
    "👑".to_string()
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Yaml(e) => write!(f, "YAML error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        ConfigError::Yaml(value)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
        Self::load_from_path(path)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(&path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig = serde_yaml::from_str(text)?;
        Ok(cfg)
    }
}
