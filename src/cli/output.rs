//! Output formatting
//!
//! Global output mode (quiet / JSON / verbosity), user-facing error display
//! and status prefixes. Logs go to stderr; everything here that is meant for
//! scripts goes to stdout.

use std::sync::OnceLock;

use serde::Serialize;

static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

/// How command output is presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Suppress everything but errors
    pub quiet: bool,
    /// Print machine-readable JSON instead of text
    pub json: bool,
    /// Verbosity from repeated `-v`
    pub verbose: u8,
}

impl OutputConfig {
    /// Create an output configuration from the global flags
    #[must_use]
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Make this the process-wide configuration
    ///
    /// Only the first call takes effect.
    pub fn apply_global(self) {
        let _ = OUTPUT_CONFIG.set(self);
    }

    /// The process-wide configuration, or the default if none was applied
    #[must_use]
    pub fn current() -> Self {
        OUTPUT_CONFIG.get().copied().unwrap_or_default()
    }

    /// Default log level for these flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Whether human-readable text should be printed
    #[must_use]
    pub fn shows_text(&self) -> bool {
        !self.quiet && !self.json
    }
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an error and its causes to stderr
pub fn display_error(err: &anyhow::Error) {
    eprintln!("{} Error: {err}", status::ERROR);
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";
}
