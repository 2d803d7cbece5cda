//! fwtools CLI - Firmware image and configuration tools
//!
//! Entry point for the fwtools command-line application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fwtools::cli::output::{display_error, OutputConfig};
use fwtools::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Apply output configuration globally
    let output_config = OutputConfig::new(cli.quiet, cli.json, cli.verbose);
    output_config.apply_global();

    // Initialize tracing subscriber; RUST_LOG directives apply on top
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(output_config.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        git_sha = option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        git_dirty = option_env!("VERGEN_GIT_DIRTY").unwrap_or("unknown"),
        built = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target = option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown"),
        rustc = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown"),
        "Starting fwtools"
    );

    // Run the command and handle errors
    match cli.run() {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
