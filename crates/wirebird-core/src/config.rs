//! Client configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable names understood by the client.
pub mod env_vars {
    use std::path::PathBuf;

    /// Path to the optional extension module. Unset or empty disables the
    /// extension mechanism entirely.
    pub const EXTENSION_MODULE: &str = "WIREBIRD_EXTENSION_MODULE";

    /// Path to the durable metadata store database.
    pub const STORE_PATH: &str = "WIREBIRD_STORE_PATH";

    /// Read the extension module path from the environment.
    pub fn extension_module() -> Option<PathBuf> {
        std::env::var(EXTENSION_MODULE)
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    /// Read the metadata store path from the environment.
    pub fn store_path() -> Option<PathBuf> {
        std::env::var(STORE_PATH)
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }
}

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Path to the optional extension module. `None` or an empty path
    /// disables the feature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_module: Option<PathBuf>,

    /// Location of the durable metadata store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Build a configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            extension_module: env_vars::extension_module(),
            store_path: env_vars::store_path(),
        }
    }

    /// The configured extension module path, treating an empty path as
    /// disabled.
    pub fn extension_module(&self) -> Option<&Path> {
        self.extension_module
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_disables_extension() {
        let config = ClientConfig::default();
        assert!(config.extension_module().is_none());
    }

    #[test]
    fn test_empty_path_counts_as_disabled() {
        let config = ClientConfig {
            extension_module: Some(PathBuf::new()),
            ..Default::default()
        };
        assert!(config.extension_module().is_none());
    }

    #[test]
    fn test_configured_path_is_returned() {
        let config = ClientConfig {
            extension_module: Some(PathBuf::from("/opt/wirebird/ext.so")),
            ..Default::default()
        };
        assert_eq!(
            config.extension_module(),
            Some(Path::new("/opt/wirebird/ext.so"))
        );
    }
}
