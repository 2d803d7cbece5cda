//! Json-set command implementation
//!
//! Implements `fwtools json-set`: update one value in a JSON document in place.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::cli::output::{print_json, OutputConfig};
use crate::core::{document, keypath};
use crate::infra::filesystem;

#[derive(Debug, Serialize)]
struct SetOutput<'a> {
    file: &'a Path,
    key: &'a str,
    value: &'a Value,
    previous: Option<Value>,
}

/// Execute the json-set command
pub fn execute(file: &Path, key: &str, value: &str, as_json: bool, indent: usize) -> Result<()> {
    let output_config = OutputConfig::current();

    let content = filesystem::read_file(file)?;
    let mut doc = document::parse(&file.display().to_string(), &content)?;

    let new_value = keypath::parse_value(value, as_json);
    let previous = keypath::set_path(&mut doc, key, new_value.clone())
        .with_context(|| format!("Cannot set '{key}' in {}", file.display()))?;

    let mut text = document::to_pretty_string(&doc, indent)?;
    text.push('\n');
    filesystem::write_file(file, &text)?;

    if output_config.json {
        print_json(&SetOutput {
            file,
            key,
            value: &new_value,
            previous,
        })?;
    } else if !output_config.quiet {
        println!("Updated {} with '{key}' = '{value}'", file.display());
    }

    Ok(())
}
