//! Settings management
//!
//! Reads optional defaults from TOML files. Three layers are consulted in
//! order, each overriding the previous one field by field:
//!
//! 1. `config.toml` in the global config directory
//! 2. `fwtools.toml` in the working directory
//! 3. a file named with `--config` / `FWTOOLS_CONFIG`
//!
//! A missing global or project file yields defaults; an explicitly named file
//! must exist. Any file that exists but does not parse is an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::defaults::{JSON_INDENT, PROJECT_SETTINGS_FILE};
use crate::core::header::HeaderFormat;
use crate::core::merge::MergeDepth;
use crate::error::SettingsError;
use crate::infra::dirs::FwtoolsDirs;

/// Settings for all fwtools commands
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Image combining defaults
    #[serde(default)]
    pub combine: CombineSettings,

    /// JSON merge defaults
    #[serde(default)]
    pub merge: MergeSettings,

    /// Output formatting
    #[serde(default)]
    pub output: OutputSettings,

    /// Header constants
    #[serde(default)]
    pub header: HeaderSettings,
}

/// Image combining defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CombineSettings {
    /// Offset of the firmware header in the image
    pub header_offset: Option<u64>,

    /// Offset of the application in the image
    pub app_offset: Option<u64>,
}

/// JSON merge defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeSettings {
    /// Merge depth: a number of levels or `"unlimited"`
    pub depth: Option<DepthSetting>,
}

/// Merge depth as written in a settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepthSetting {
    /// `depth = 2`
    Levels(usize),
    /// `depth = "unlimited"`
    Named(String),
}

/// Output formatting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    /// Spaces per indentation level in written JSON
    pub indent: Option<usize>,
}

/// Header constants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderSettings {
    /// Magic code
    pub magic: Option<u32>,

    /// Header layout revision
    pub version: Option<u32>,
}

impl Settings {
    /// Load and layer every settings source
    ///
    /// `project_dir` is searched for `fwtools.toml`; `explicit` is the file
    /// given on the command line, if any.
    pub fn load(
        dirs: &FwtoolsDirs,
        project_dir: &Path,
        explicit: Option<&Path>,
    ) -> Result<Self, SettingsError> {
        let mut settings = Self::load_from_path(&dirs.global_settings_path())?;
        settings.overlay(Self::load_from_path(&project_dir.join(PROJECT_SETTINGS_FILE))?);

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(SettingsError::NotFound {
                    path: path.display().to_string(),
                });
            }
            settings.overlay(Self::load_from_path(path)?);
        }

        // Surface a bad depth now rather than at first use
        settings.merge_depth()?;
        Ok(settings)
    }

    /// Load settings from a specific path
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        let settings = toml::from_str(&content).map_err(|e| SettingsError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Override fields with those set in `other`
    pub fn overlay(&mut self, other: Self) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.combine.header_offset, other.combine.header_offset);
        take(&mut self.combine.app_offset, other.combine.app_offset);
        take(&mut self.merge.depth, other.merge.depth);
        take(&mut self.output.indent, other.output.indent);
        take(&mut self.header.magic, other.header.magic);
        take(&mut self.header.version, other.header.version);
    }

    /// Effective header constants
    #[must_use]
    pub fn header_format(&self) -> HeaderFormat {
        let defaults = HeaderFormat::default();
        HeaderFormat {
            magic: self.header.magic.unwrap_or(defaults.magic),
            version: self.header.version.unwrap_or(defaults.version),
        }
    }

    /// Effective JSON indentation
    #[must_use]
    pub fn json_indent(&self) -> usize {
        self.output.indent.unwrap_or(JSON_INDENT)
    }

    /// Effective merge depth
    pub fn merge_depth(&self) -> Result<MergeDepth, SettingsError> {
        match &self.merge.depth {
            None => Ok(MergeDepth::default()),
            Some(DepthSetting::Levels(n)) => Ok(MergeDepth::Limited(*n)),
            Some(DepthSetting::Named(name)) => {
                name.parse().map_err(|error| SettingsError::InvalidValue {
                    key: "merge.depth".to_string(),
                    error,
                })
            }
        }
    }
}
