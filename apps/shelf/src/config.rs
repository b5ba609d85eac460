//! Application configuration.
//!
//! Configuration is read from TOML: the path given as the first
//! command-line argument, or `gameshelf.toml` in the working directory.
//! A missing file means defaults; nothing is ever written back.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default configuration file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gameshelf.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the table files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File name of the games table inside `data_dir`.
    #[serde(default = "default_games_file")]
    pub games_file: String,

    /// File name of the users table inside `data_dir`.
    #[serde(default = "default_users_file")]
    pub users_file: String,

    /// Show the login gate before the collection menus.
    #[serde(default = "default_true")]
    pub require_login: bool,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_games_file() -> String {
    "games.csv".into()
}

fn default_users_file() -> String {
    "users.csv".into()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            games_file: default_games_file(),
            users_file: default_users_file(),
            require_login: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from [`DEFAULT_CONFIG_FILE`].
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Full path of the games table.
    pub fn games_path(&self) -> PathBuf {
        self.data_dir.join(&self.games_file)
    }

    /// Full path of the users table.
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }
}
