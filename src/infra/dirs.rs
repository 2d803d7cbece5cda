//! Platform-specific directory management
//!
//! Locates the global config directory. Follows the XDG Base Directory
//! Specification on Linux and standard locations on macOS; `FWTOOLS_CONFIG_DIR`
//! overrides the platform default.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::defaults::{ENV_CONFIG_DIR, GLOBAL_SETTINGS_FILE};

/// Application name used in directory paths
const APP_NAME: &str = "fwtools";

/// Platform-specific directory provider for fwtools
#[derive(Debug, Clone)]
pub struct FwtoolsDirs {
    config_dir: PathBuf,
}

impl FwtoolsDirs {
    /// Create a new `FwtoolsDirs` instance
    ///
    /// Checks the environment first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Use a fixed config directory
    #[must_use]
    pub fn with_config_dir(path: &Path) -> Self {
        Self {
            config_dir: path.to_path_buf(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/fwtools` or `~/.config/fwtools`
    /// - macOS: `~/Library/Application Support/fwtools`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Path to `config.toml` in the config directory
    #[must_use]
    pub fn global_settings_path(&self) -> PathBuf {
        self.config_dir.join(GLOBAL_SETTINGS_FILE)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        Self::platform_config_dir()
    }

    fn platform_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for FwtoolsDirs {
    fn default() -> Self {
        Self::new()
    }
}
