//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! deptool has a single, user-level configuration scope. Every run starts
//! from a fresh throwaway store, so there is nothing repository-scoped to
//! configure.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. User config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$DEPTOOL_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/deptool/config.toml`
//! 3. `~/.deptool/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use deptool::core::config::{Config, ConfigSearch};
//!
//! let config = Config::load_with(&ConfigSearch::from_env()).unwrap();
//! println!("Fetching from: {}", config.base_url());
//! println!("Remote alias: {}", config.remote());
//! ```

pub mod schema;

pub use schema::UserConfig;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Hosting service that repository slugs resolve against by default.
pub const DEFAULT_BASE_URL: &str = "https://github.com/";

/// Alias the fetched repository is registered under by default.
pub const DEFAULT_REMOTE: &str = "upstream";

/// Tracking-metadata file rewritten by the upstream publishing bot.
pub const DEFAULT_METADATA_PATHS: &[&str] = &["Godeps/Godeps.json"];

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Where to look for the config file.
///
/// Built from the environment by [`ConfigSearch::from_env`]; tests build it
/// directly so they never touch process-wide environment variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigSearch {
    /// Explicit file (`$DEPTOOL_CONFIG`)
    pub explicit: Option<PathBuf>,
    /// `$XDG_CONFIG_HOME`
    pub xdg_config_home: Option<PathBuf>,
    /// The user's home directory
    pub home: Option<PathBuf>,
}

impl ConfigSearch {
    /// Capture the search locations from the process environment.
    pub fn from_env() -> Self {
        Self {
            explicit: std::env::var_os("DEPTOOL_CONFIG").map(PathBuf::from),
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            home: dirs::home_dir(),
        }
    }

    /// Candidate paths in precedence order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(explicit) = &self.explicit {
            paths.push(explicit.clone());
        }
        if let Some(xdg) = &self.xdg_config_home {
            paths.push(xdg.join("deptool/config.toml"));
        }
        if let Some(home) = &self.home {
            paths.push(home.join(".deptool/config.toml"));
        }
        paths
    }
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// User configuration
    pub user: UserConfig,
    /// Path to the config file (if one was loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the first existing candidate of `search`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated. Missing config files are not an error.
    pub fn load_with(search: &ConfigSearch) -> Result<Self, ConfigError> {
        for path in search.candidates() {
            if path.exists() {
                return Self::load_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load and validate a specific config file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let user: UserConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        user.validate()?;

        Ok(Self {
            user,
            path: Some(path.to_path_buf()),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Hosting base URL. Defaults to [`DEFAULT_BASE_URL`].
    pub fn base_url(&self) -> &str {
        self.user.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Remote alias. Defaults to [`DEFAULT_REMOTE`].
    pub fn remote(&self) -> &str {
        self.user.remote.as_deref().unwrap_or(DEFAULT_REMOTE)
    }

    /// Output format name. Defaults to "text".
    pub fn format(&self) -> &str {
        self.user.format.as_deref().unwrap_or("text")
    }

    /// Tracking-metadata paths. Defaults to [`DEFAULT_METADATA_PATHS`].
    pub fn metadata_paths(&self) -> Vec<String> {
        match &self.user.metadata_paths {
            Some(paths) => paths.clone(),
            None => DEFAULT_METADATA_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
