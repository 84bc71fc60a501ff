//! Host configuration via `hotkeep.toml`
//!
//! On first open of a project directory, a default `hotkeep.toml` is
//! created. To change settings, edit the file and restart the host.

use hotkeep_core::{Error, Result};
use hotkeep_engine::HANDOFF_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name placed in the project directory.
pub const CONFIG_FILE_NAME: &str = "hotkeep.toml";

/// Host configuration loaded from `hotkeep.toml`.
///
/// # Example
///
/// ```toml
/// # Attach a reload channel to every loaded module
/// hot = true
///
/// # Handoff entry under which persisted slots are staged
/// handoff_namespace = "__hotkeep__"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    /// Attach a reload channel to loaded modules.
    #[serde(default = "default_hot")]
    pub hot: bool,
    /// Handoff entry under which persisted slots are staged.
    #[serde(default = "default_handoff_namespace")]
    pub handoff_namespace: String,
}

fn default_hot() -> bool {
    true
}

fn default_handoff_namespace() -> String {
    HANDOFF_NAMESPACE.to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            hot: default_hot(),
            handoff_namespace: default_handoff_namespace(),
        }
    }
}

impl HostConfig {
    /// Config for an ordinary, non-reloading host.
    pub fn cold() -> Self {
        Self {
            hot: false,
            ..Self::default()
        }
    }

    /// Check invariants not expressible in the TOML schema.
    ///
    /// # Errors
    ///
    /// Returns an error if `handoff_namespace` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.handoff_namespace.trim().is_empty() {
            return Err(Error::Config(
                "handoff_namespace in hotkeep.toml must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# hotkeep host configuration
#
# Attach a reload channel to every loaded module (default: true).
# With hot = false every persistence call simply runs its factory.
hot = true

# Handoff entry under which persisted slots are staged (default: "__hotkeep__").
# Only change this if another tool already uses the default entry.
handoff_namespace = "__hotkeep__"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HostConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
