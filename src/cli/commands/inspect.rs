//! Inspect command implementation
//!
//! Implements `fwtools inspect`: decode the firmware header of one or more
//! combined images, verify it, and pick the newest image. An image that
//! cannot be read or decoded is reported as failed alongside the others.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::output::{print_json, status, OutputConfig};
use crate::core::header::HeaderFormat;
use crate::core::image::{self, ImageReport};
use crate::infra::filesystem;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectedImage {
    path: PathBuf,
    valid: bool,
    #[serde(flatten)]
    report: Option<ImageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl InspectedImage {
    fn failed(path: &Path, err: &anyhow::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            valid: false,
            report: None,
            error: Some(format!("{err:#}")),
        }
    }
}

#[derive(Debug, Serialize)]
struct InspectOutput<'a> {
    images: &'a [InspectedImage],
    #[serde(skip_serializing_if = "Option::is_none")]
    preferred: Option<&'a Path>,
}

/// Execute the inspect command
pub fn execute(
    images: &[PathBuf],
    header_offset: Option<u64>,
    app_offset: Option<u64>,
    format: HeaderFormat,
) -> Result<()> {
    let output_config = OutputConfig::current();

    let Some(header_offset) = header_offset else {
        bail!("No header offset given. Pass --header-offset or set combine.header_offset in fwtools.toml");
    };

    let inspected: Vec<InspectedImage> = images
        .iter()
        .map(|path| {
            inspect_one(path, header_offset, app_offset, &format).unwrap_or_else(|err| {
                tracing::warn!("{}: {err:#}", path.display());
                InspectedImage::failed(path, &err)
            })
        })
        .collect();

    let preferred = if inspected.len() > 1 {
        preferred_image(&inspected).map(|i| i.path.as_path())
    } else {
        None
    };

    if output_config.json {
        print_json(&InspectOutput {
            images: &inspected,
            preferred,
        })?;
    } else if !output_config.quiet {
        for image in &inspected {
            print_report(image);
        }
        if let Some(path) = preferred {
            println!("Preferred image: {}", path.display());
        }
    }

    let failed: Vec<&InspectedImage> = inspected.iter().filter(|i| !i.valid).collect();
    if !failed.is_empty() {
        let names: Vec<String> = failed.iter().map(|i| i.path.display().to_string()).collect();
        bail!("Verification failed for {}", names.join(", "));
    }

    Ok(())
}

fn inspect_one(
    path: &Path,
    header_offset: u64,
    app_offset: Option<u64>,
    format: &HeaderFormat,
) -> Result<InspectedImage> {
    let bytes = filesystem::read_bytes(path)
        .with_context(|| format!("Cannot read image {}", path.display()))?;
    let report = image::inspect(&bytes, header_offset, app_offset, format)
        .with_context(|| format!("Cannot decode header of {}", path.display()))?;

    tracing::debug!("{}: {} checks, valid = {}", path.display(), report.checks.len(), report.is_valid());

    Ok(InspectedImage {
        path: path.to_path_buf(),
        valid: report.is_valid(),
        report: Some(report),
        error: None,
    })
}

/// The valid image with the largest firmware version; first wins on ties
fn preferred_image(images: &[InspectedImage]) -> Option<&InspectedImage> {
    images
        .iter()
        .filter(|i| i.valid)
        .filter_map(|i| i.report.as_ref().map(|report| (i, report)))
        .fold(None, |best: Option<(&InspectedImage, &ImageReport)>, candidate| match best {
            Some(best) if !candidate.1.header.is_newer_than(&best.1.header) => Some(best),
            _ => Some(candidate),
        })
        .map(|(image, _)| image)
}

fn print_report(image: &InspectedImage) {
    println!("{}:", image.path.display());
    let Some(report) = &image.report else {
        if let Some(err) = &image.error {
            println!("  {} {err}", status::ERROR);
        }
        return;
    };
    let fields = &report.fields;
    println!("  magic:           {}", fields.magic);
    println!("  version:         {}", fields.version);
    println!("  checksum:        {}", fields.checksum);
    println!("  totalSize:       {}", fields.total_size);
    println!("  firmwareVersion: {}", fields.firmware_version);
    println!("  firmwareSHA256:  {}", fields.firmware_sha256);
    for check in &report.checks {
        match &check.detail {
            None => println!("  {} {}", status::SUCCESS, check.name),
            Some(detail) => println!("  {} {}: {detail}", status::ERROR, check.name),
        }
    }
}
