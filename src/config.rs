//! Configuration loading
//!
//! Reads `~/.config/dashchat/config.toml`. A missing file is not an error; a
//! malformed one falls back to defaults and reports a warning for the caller
//! to show.

mod types;

use std::fs;
use std::path::{Path, PathBuf};

pub use types::{Config, DEFAULT_BASE_URL, ServerConfig};

const CONFIG_DIR: &str = "dashchat";
const CONFIG_FILE: &str = "config.toml";

/// Loaded configuration plus an optional warning for the user
#[derive(Debug, Clone)]
pub struct ConfigResult {
    pub config: Config,
    pub warning: Option<String>,
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
}

pub fn load_config() -> ConfigResult {
    match config_path() {
        Some(path) => load_config_from_path(&path),
        None => ConfigResult {
            config: Config::default(),
            warning: None,
        },
    }
}

pub fn load_config_from_path(path: &Path) -> ConfigResult {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::debug!("No config at {}: {}", path.display(), e);
            return ConfigResult {
                config: Config::default(),
                warning: None,
            };
        }
    };

    match toml::from_str::<Config>(&contents) {
        Ok(config) => ConfigResult {
            config,
            warning: None,
        },
        Err(e) => {
            let warning = format!("Invalid config at {}: {}", path.display(), e);
            log::warn!("{}", warning);
            ConfigResult {
                config: Config::default(),
                warning: Some(warning),
            }
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
