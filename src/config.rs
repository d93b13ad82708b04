//! Configuration stored in ~/.nudge/config.json
//!
//! The demo runs with zero setup, so a missing config file yields the
//! defaults. A file that exists but cannot be read or parsed is an error —
//! silently ignoring a broken config hides real mistakes.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::NudgeError;
use crate::types::DEFAULT_OWNER;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding tasks.json, demo messages, and the intent
    /// vocabulary.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Default owner for extracted tasks.
    #[serde(default = "default_owner")]
    pub owner: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            owner: default_owner(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, NudgeError> {
        let Some(home) = dirs::home_dir() else {
            return Ok(Config::default());
        };
        let config_path = home.join(".nudge").join("config.json");
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)?;
        serde_json::from_str(&content)
            .map_err(|e| NudgeError::parse(&config_path.display().to_string(), e))
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join("tasks.json")
    }

    pub fn demo_messages_path(&self) -> PathBuf {
        self.data_dir.join("demo_messages.json")
    }

    pub fn intent_vocabulary_path(&self) -> PathBuf {
        self.data_dir.join("intent_vocabulary.json")
    }
}
