//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod combine;
pub mod compare;
pub mod inspect;
pub mod merge;
pub mod set;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::core::merge::MergeDepth;
use crate::core::settings::Settings;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Combine a bootloader and an application into one image
    Combine {
        /// Bootloader binary
        #[arg(short, long)]
        bootloader: PathBuf,

        /// Application binary
        #[arg(short, long)]
        app: PathBuf,

        /// Application offset (decimal or 0x-prefixed hex)
        #[arg(short = 'c', long, value_parser = parse_offset)]
        app_offset: Option<u64>,

        /// Firmware header offset (decimal or 0x-prefixed hex)
        #[arg(short = 'd', long, value_parser = parse_offset)]
        header_offset: Option<u64>,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,

        /// Firmware version to stamp (defaults to the current Unix time)
        #[arg(short = 's', long)]
        set_version: Option<u64>,
    },

    /// Decode and verify the firmware header of combined images
    Inspect {
        /// Combined images
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Firmware header offset (decimal or 0x-prefixed hex)
        #[arg(short = 'd', long, value_parser = parse_offset)]
        header_offset: Option<u64>,

        /// Application offset; enables the payload digest check
        #[arg(short = 'c', long, value_parser = parse_offset)]
        app_offset: Option<u64>,
    },

    /// Merge an overlay JSON document into an original one
    #[command(name = "merge-json")]
    MergeJson {
        /// Original document
        original: PathBuf,

        /// Overlay document
        overlay: PathBuf,

        /// Object levels to merge below the root, or 'unlimited'
        #[arg(long)]
        depth: Option<MergeDepth>,

        /// Treat a missing overlay file as empty
        #[arg(long)]
        optional: bool,

        /// Output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Set a value in a JSON document by dotted key path
    #[command(name = "json-set")]
    JsonSet {
        /// Document to update in place
        file: PathBuf,

        /// Dotted key path, e.g. config.version.value
        key: String,

        /// New value, stored verbatim as a string
        value: String,

        /// Parse the value as JSON (numbers, booleans, objects)
        #[arg(long)]
        json_value: bool,
    },

    /// Check that every expected line appears in a captured log
    #[command(name = "compare-logs")]
    CompareLogs {
        /// File listing expected messages, one per line
        expected: PathBuf,

        /// Captured log
        actual: PathBuf,

        /// Treat expected lines as regular expressions
        #[arg(long)]
        regex: bool,
    },
}

impl Commands {
    /// Whether the command takes anything from the settings files
    pub fn reads_settings(&self) -> bool {
        !matches!(self, Self::CompareLogs { .. })
    }

    /// Execute the command
    pub fn run(self, settings: &Settings) -> Result<()> {
        match self {
            Self::Combine {
                bootloader,
                app,
                app_offset,
                header_offset,
                output,
                set_version,
            } => {
                let options = combine::CombineOptions {
                    bootloader,
                    app,
                    header_offset: header_offset.or(settings.combine.header_offset),
                    app_offset: app_offset.or(settings.combine.app_offset),
                    output,
                    firmware_version: set_version,
                };
                combine::execute(options, settings.header_format())
            }
            Self::Inspect {
                images,
                header_offset,
                app_offset,
            } => inspect::execute(
                &images,
                header_offset.or(settings.combine.header_offset),
                app_offset,
                settings.header_format(),
            ),
            Self::MergeJson {
                original,
                overlay,
                depth,
                optional,
                output,
            } => {
                let depth = match depth {
                    Some(depth) => depth,
                    None => settings.merge_depth()?,
                };
                merge::execute(
                    &original,
                    &overlay,
                    depth,
                    optional,
                    output.as_deref(),
                    settings.json_indent(),
                )
            }
            Self::JsonSet {
                file,
                key,
                value,
                json_value,
            } => set::execute(&file, &key, &value, json_value, settings.json_indent()),
            Self::CompareLogs {
                expected,
                actual,
                regex,
            } => compare::execute(&expected, &actual, regex),
        }
    }
}

/// Parse an offset given in decimal or `0x`-prefixed hexadecimal
pub fn parse_offset(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid offset '{s}': {e}"))
}
