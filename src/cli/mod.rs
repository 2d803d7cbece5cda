//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::config::defaults::ENV_CONFIG_FILE;
use crate::core::settings::Settings;
use crate::infra::dirs::FwtoolsDirs;
use commands::Commands;

/// fwtools - Firmware image and configuration tools
///
/// Combine bootloaders with applications behind a verified metadata header,
/// and maintain the JSON configuration and logs around a firmware build.
#[derive(Parser, Debug)]
#[command(name = "fwtools")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Settings file applied on top of the global and project settings
    #[arg(long, global = true, env = ENV_CONFIG_FILE)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let Some(cmd) = self.command else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            return Ok(());
        };

        let settings = if cmd.reads_settings() {
            let current_dir = std::env::current_dir()?;
            Settings::load(&FwtoolsDirs::new(), &current_dir, self.config.as_deref())
                .context("Cannot load settings")?
        } else {
            Settings::default()
        };

        cmd.run(&settings)
    }
}
