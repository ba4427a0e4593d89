//! Layered configuration.
//!
//! Sources, highest priority first:
//! 1. Environment variables with the `SHIFT_BOARD_` prefix
//!    (`SHIFT_BOARD_HTTP_ADDR`, `SHIFT_BOARD_MISSING_POLICY`, ...)
//! 2. `shift-board.toml` in the working directory, or the file named by
//!    `SHIFT_BOARD_CONFIG`
//! 3. Built-in defaults

use crate::error::MissingPolicy;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_PREFIX: &str = "SHIFT_BOARD_";
pub const DEFAULT_CONFIG_FILE: &str = "shift-board.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Figment(Box::new(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Address the HTTP server binds to.
    pub http_addr: String,
    /// How stores answer commands that name an unknown or ineligible id.
    pub missing_policy: MissingPolicy,
    /// Default `tracing` filter when `SHIFT_BOARD_LOG` is unset.
    pub log_level: String,
    /// When set, the board is loaded from and saved to this SQLite file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqlite_path: Option<PathBuf>,
    /// Fill an empty board with the demo roster and tasks on startup.
    pub seed_sample_data: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:3000".to_string(),
            missing_policy: MissingPolicy::Report,
            log_level: "info".to_string(),
            sqlite_path: None,
            seed_sample_data: false,
        }
    }
}

impl BoardConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    pub fn figment() -> Figment {
        let file = std::env::var(format!("{ENV_PREFIX}CONFIG"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config", "log"]))
    }
}
