//! Merge-json command implementation
//!
//! Implements `fwtools merge-json`: recursively merge an overlay document into
//! an original one and write the result.

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::output::{status, OutputConfig};
use crate::core::document;
use crate::core::merge::{self, MergeDepth};
use crate::infra::filesystem;

/// Execute the merge-json command
pub fn execute(
    original: &Path,
    overlay: &Path,
    depth: MergeDepth,
    optional: bool,
    output: Option<&Path>,
    indent: usize,
) -> Result<()> {
    let mut doc = load(original)?;

    if optional && !overlay.exists() {
        tracing::info!("Overlay {} not found, keeping original", overlay.display());
        if !OutputConfig::current().quiet {
            eprintln!(
                "{} {} does not exist, leaving {} unchanged",
                status::WARNING,
                overlay.display(),
                original.display()
            );
        }
    } else {
        let overlay_doc = load(overlay)?;
        tracing::debug!("Merging {} into {} (depth {depth})", overlay.display(), original.display());
        merge::merge(&mut doc, overlay_doc, depth);
    }

    let mut text = document::to_pretty_string(&doc, indent)?;
    text.push('\n');

    match output {
        Some(path) => filesystem::write_file(path, &text)
            .with_context(|| format!("Cannot write merged document to {}", path.display()))?,
        None => print!("{text}"),
    }

    Ok(())
}

fn load(path: &Path) -> Result<serde_json::Value> {
    let content = filesystem::read_file(path)?;
    Ok(document::parse(&path.display().to_string(), &content)?)
}
