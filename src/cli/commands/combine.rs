//! Combine command implementation
//!
//! Implements `fwtools combine`: bootloader + firmware header + application
//! written as one image.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::cli::output::{print_json, OutputConfig};
use crate::core::header::HeaderFormat;
use crate::core::image::{self, ImageLayout, ImagePlan};
use crate::infra::filesystem;

/// Resolved arguments for `fwtools combine`
#[derive(Debug, Clone)]
pub struct CombineOptions {
    pub bootloader: PathBuf,
    pub app: PathBuf,
    pub header_offset: Option<u64>,
    pub app_offset: Option<u64>,
    pub output: PathBuf,
    pub firmware_version: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CombineSummary {
    output: PathBuf,
    image_size: u32,
    image_hash: String,
    image_version: u64,
    layout: ImagePlan,
}

/// Execute the combine command
pub fn execute(options: CombineOptions, format: HeaderFormat) -> Result<()> {
    let output_config = OutputConfig::current();

    let Some(header_offset) = options.header_offset else {
        bail!("No header offset given. Pass --header-offset or set combine.header_offset in fwtools.toml");
    };
    let Some(app_offset) = options.app_offset else {
        bail!("No application offset given. Pass --app-offset or set combine.app_offset in fwtools.toml");
    };

    let firmware_version = match options.firmware_version {
        Some(version) => version,
        None => unix_time()?,
    };

    let bootloader = filesystem::read_bytes(&options.bootloader)
        .with_context(|| format!("Cannot read bootloader {}", options.bootloader.display()))?;
    let app = filesystem::read_bytes(&options.app)
        .with_context(|| format!("Cannot read application {}", options.app.display()))?;

    tracing::info!(
        "Combining {} ({} bytes) with {} ({} bytes)",
        options.bootloader.display(),
        bootloader.len(),
        options.app.display(),
        app.len()
    );

    let layout = ImageLayout::new(header_offset, app_offset);
    let (plan, header) = image::prepare(&bootloader, &app, &layout, format, firmware_version)
        .context("Cannot lay out the combined image")?;

    if output_config.shows_text() {
        println!("imageSize:    {}", header.total_size.get());
        println!("imageHash:    {}", header.sha256_hex());
        println!("imageversion: {}", header.firmware_version.get());
    }

    filesystem::write_atomic(&options.output, |out| {
        plan.write_to(out, &bootloader, &header, &app)
    })?;

    let output = options
        .output
        .canonicalize()
        .with_context(|| format!("Cannot resolve {}", options.output.display()))?;

    if output_config.json && !output_config.quiet {
        print_json(&CombineSummary {
            output,
            image_size: header.total_size.get(),
            image_hash: header.sha256_hex(),
            image_version: header.firmware_version.get(),
            layout: plan,
        })?;
    } else if output_config.shows_text() {
        println!("Combined binary: {}", output.display());
    }

    Ok(())
}

fn unix_time() -> Result<u64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the Unix epoch")?;
    Ok(elapsed.as_secs())
}
