use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AUTHOR, DEFAULT_DATABASE_PATH};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Author used when a command does not name one
    pub default_author: String,
    /// Directory of YAML definitions loaded by `init`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_directory: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            default_author: DEFAULT_AUTHOR.to_string(),
            seed_directory: None,
        }
    }
}

impl CatalogConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: CatalogConfig = serde_yaml::from_str(&content)
            .context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }
}

/// Load the config at `config_path`, writing the defaults there first if
/// the file does not exist. Without a path the defaults are returned.
pub fn load_or_create_config(config_path: Option<&Path>) -> Result<CatalogConfig> {
    match config_path {
        Some(path) if path.exists() => CatalogConfig::from_yaml_file(path),
        Some(path) => {
            info!("Creating default config at {}", path.display());
            let default_config = CatalogConfig::default();
            default_config.save_to_yaml_file(path)?;
            Ok(default_config)
        }
        None => {
            debug!("No config path provided, using default configuration");
            Ok(CatalogConfig::default())
        }
    }
}
