//! core::config::schema
//!
//! Configuration schema types.
//!
//! # User Config
//!
//! Located at (in order of precedence):
//! 1. `$DEPTOOL_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/deptool/config.toml`
//! 3. `~/.deptool/config.toml`
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., the remote alias must be usable inside a ref name).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::RefName;

/// Output formats accepted by the `format` key.
pub const VALID_FORMATS: &[&str] = &["text", "json"];

/// User configuration.
///
/// # Example
///
/// ```toml
/// base_url = "https://github.com/"
/// remote = "upstream"
/// format = "text"
/// metadata_paths = ["Godeps/Godeps.json", "glide.lock"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    /// Hosting service base URL that repository slugs are appended to
    pub base_url: Option<String>,

    /// Alias the fetched remote is registered under
    pub remote: Option<String>,

    /// Default output format ("text" or "json")
    pub format: Option<String>,

    /// Paths whose sole modification marks a commit as publishing noise
    pub metadata_paths: Option<Vec<String>>,
}

impl UserConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.base_url {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "base_url cannot be empty".to_string(),
                ));
            }
        }

        if let Some(remote) = &self.remote {
            validate_remote(remote)?;
        }

        if let Some(format) = &self.format {
            if !VALID_FORMATS.contains(&format.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid format '{}', must be one of: {}",
                    format,
                    VALID_FORMATS.join(", ")
                )));
            }
        }

        if let Some(paths) = &self.metadata_paths {
            for path in paths {
                if path.is_empty() || path.starts_with('/') {
                    return Err(ConfigError::InvalidValue(format!(
                        "metadata path '{}' must be a non-empty repository-relative path",
                        path
                    )));
                }
            }
        }

        Ok(())
    }
}

/// A remote alias must form a valid `refs/remotes/<alias>` ref and be a
/// single path component.
pub fn validate_remote(remote: &str) -> Result<(), ConfigError> {
    if remote.contains('/') {
        return Err(ConfigError::InvalidValue(format!(
            "invalid remote '{}': must not contain '/'",
            remote
        )));
    }
    RefName::new(format!("refs/remotes/{remote}"))
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidValue(format!("invalid remote '{}': {}", remote, e)))
}
