//! Compare-logs command implementation
//!
//! Implements `fwtools compare-logs`: every expected message must appear in a
//! captured log. The log is decoded lossily, so stray non-UTF-8 bytes from a
//! serial console do not stop the check.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::cli::output::{print_json, OutputConfig};
use crate::core::logcheck::LogCheck;
use crate::infra::filesystem;

/// Execute the compare-logs command
pub fn execute(expected: &Path, actual: &Path, regex: bool) -> Result<()> {
    let output_config = OutputConfig::current();

    let expected_text = filesystem::read_file(expected)?;
    let actual_bytes = filesystem::read_bytes(actual)?;
    let actual_text = String::from_utf8_lossy(&actual_bytes);

    let check = if regex {
        LogCheck::regex(&expected_text)
            .with_context(|| format!("Cannot compile expectations from {}", expected.display()))?
    } else {
        LogCheck::literal(&expected_text)
    };

    let report = check.check(&actual_text);
    tracing::info!(
        "Checked {} expected messages against {}",
        report.checked,
        actual.display()
    );

    if output_config.json {
        print_json(&serde_json::json!({
            "checked": report.checked,
            "missing": report.missing,
        }))?;
    }

    if report.is_clean() {
        return Ok(());
    }

    if !output_config.json {
        println!(
            "ERROR: Some expected output was not seen in your {}:",
            actual.display()
        );
        println!("{}", report.missing.join("\n"));
        println!(
            "\nIf that missing message is ok, remove it from {}.",
            expected.display()
        );
    }

    bail!(
        "{} of {} expected messages missing from {}",
        report.missing.len(),
        report.checked,
        actual.display()
    )
}
