//! Global groupcal configuration.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{GroupCalError, GroupCalResult};

static DEFAULT_DATA_DIR: &str = "~/groupcal";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn is_default_data_dir(p: &PathBuf) -> bool {
    *p == default_data_dir()
}

/// Global configuration at ~/.config/groupcal/config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCalConfig {
    /// Where the document collections live on disk.
    #[serde(default = "default_data_dir", skip_serializing_if = "is_default_data_dir")]
    pub data_dir: PathBuf,

    /// Identity assumed for this machine's sessions. Credential
    /// verification is the hosting environment's concern; capability still
    /// resolves through the session gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
}

impl Default for GroupCalConfig {
    fn default() -> Self {
        GroupCalConfig {
            data_dir: default_data_dir(),
            identity: None,
        }
    }
}

impl GroupCalConfig {
    pub fn config_path() -> GroupCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| GroupCalError::Config("Could not determine config directory".into()))?
            .join("groupcal");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> GroupCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        let config: GroupCalConfig = Config::builder()
            .add_source(File::from(config_path).required(false))
            .build()
            .map_err(|e| GroupCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| GroupCalError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Save the current config to ~/.config/groupcal/config.toml
    pub fn save(&self) -> GroupCalResult<()> {
        let config_path = Self::config_path()?;

        let content =
            toml::to_string_pretty(self).map_err(|e| GroupCalError::Config(e.to_string()))?;

        std::fs::write(&config_path, content)
            .map_err(|e| GroupCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    /// Create a default config file with all options commented out.
    fn create_default_config(path: &Path) -> GroupCalResult<()> {
        let contents = format!(
            "\
# groupcal configuration

# Where calendar data lives:
# data_dir = \"{}\"

# Identity used for this machine's sessions:
# identity = \"you@example.com\"
",
            DEFAULT_DATA_DIR
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GroupCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| GroupCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
