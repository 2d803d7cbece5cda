//! Combined bootloader + application images
//!
//! A combined image is laid out as
//!
//! ```text
//! [bootloader][zero pad][firmware header][zero pad][application]
//! 0           ^bootloader_len            ^header_offset + 56
//!                       ^header_offset              ^app_offset
//! ```
//!
//! Offsets are validated into an [`ImagePlan`] before anything is written,
//! so a bad layout never produces output.

use serde::Serialize;
use std::io::{self, Read, Write};

use crate::core::header::{FirmwareHeader, HeaderFormat, HeaderSummary, FIRMWARE_HEADER_SIZE};
use crate::error::{FormatError, ImageError, LayoutError};

/// Requested positions of the header and the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageLayout {
    /// Absolute offset of the firmware header
    pub header_offset: u64,
    /// Absolute offset of the application
    pub app_offset: u64,
}

/// A layout validated against concrete bootloader and application sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImagePlan {
    /// Requested offsets
    #[serde(flatten)]
    pub layout: ImageLayout,
    /// Bootloader length in bytes
    pub bootloader_len: u64,
    /// Zero bytes between the bootloader and the header
    pub header_padding: u64,
    /// Zero bytes between the header and the application
    pub app_padding: u64,
    /// Application length in bytes
    pub app_len: u64,
}

impl ImageLayout {
    /// Create a layout from explicit offsets
    pub fn new(header_offset: u64, app_offset: u64) -> Self {
        Self {
            header_offset,
            app_offset,
        }
    }

    /// Layout with no padding: header right after the bootloader, application
    /// right after the header
    #[cfg(test)]
    pub(crate) fn packed(bootloader_len: u64) -> Self {
        Self::new(bootloader_len, bootloader_len + FIRMWARE_HEADER_SIZE as u64)
    }

    /// Validate the layout for the given region sizes
    pub fn plan(&self, bootloader_len: usize, app_len: usize) -> Result<ImagePlan, LayoutError> {
        let bootloader_len = bootloader_len as u64;
        let app_len = app_len as u64;

        if self.header_offset < bootloader_len {
            return Err(LayoutError::HeaderOverlapsBootloader {
                header_offset: self.header_offset,
                bootloader_len,
            });
        }

        let header_end = self
            .header_offset
            .checked_add(FIRMWARE_HEADER_SIZE as u64)
            .ok_or(LayoutError::OutOfRange {
                offset: self.header_offset,
            })?;

        if self.app_offset < header_end {
            return Err(LayoutError::AppOverlapsHeader {
                app_offset: self.app_offset,
                header_end,
            });
        }

        self.app_offset
            .checked_add(app_len)
            .ok_or(LayoutError::OutOfRange {
                offset: self.app_offset,
            })?;

        Ok(ImagePlan {
            layout: *self,
            bootloader_len,
            header_padding: self.header_offset - bootloader_len,
            app_padding: self.app_offset - header_end,
            app_len,
        })
    }
}

impl ImagePlan {
    /// Total length of the combined image
    pub fn total_len(&self) -> u64 {
        self.layout.app_offset + self.app_len
    }

    /// Stream the combined image into `out`
    ///
    /// `bootloader` and `app` must be the buffers the plan was made for.
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        bootloader: &[u8],
        header: &FirmwareHeader,
        app: &[u8],
    ) -> io::Result<()> {
        debug_assert_eq!(bootloader.len() as u64, self.bootloader_len);
        debug_assert_eq!(app.len() as u64, self.app_len);

        out.write_all(bootloader)?;
        write_zeros(out, self.header_padding)?;
        out.write_all(&header.to_bytes())?;
        write_zeros(out, self.app_padding)?;
        out.write_all(app)?;
        out.flush()
    }
}

fn write_zeros<W: Write>(out: &mut W, len: u64) -> io::Result<()> {
    io::copy(&mut io::repeat(0).take(len), out).map(|_| ())
}

/// Plan an image and build its header without writing anything
pub fn prepare(
    bootloader: &[u8],
    app: &[u8],
    layout: &ImageLayout,
    format: HeaderFormat,
    firmware_version: u64,
) -> Result<(ImagePlan, FirmwareHeader), ImageError> {
    let plan = layout.plan(bootloader.len(), app.len())?;
    let header = FirmwareHeader::with_format(format, app, firmware_version)?;

    tracing::debug!(
        bootloader = plan.bootloader_len,
        header_padding = plan.header_padding,
        app_padding = plan.app_padding,
        app = plan.app_len,
        total = plan.total_len(),
        "Planned combined image"
    );

    Ok((plan, header))
}

/// Combine `bootloader` and `app` into `out`
///
/// Layout and header are checked first; `out` is only touched once both are
/// known to be valid.
pub fn combine<W: Write>(
    out: &mut W,
    bootloader: &[u8],
    app: &[u8],
    layout: &ImageLayout,
    format: HeaderFormat,
    firmware_version: u64,
) -> Result<(ImagePlan, FirmwareHeader), ImageError> {
    let (plan, header) = prepare(bootloader, app, layout, format, firmware_version)?;
    plan.write_to(out, bootloader, &header, app)
        .map_err(|source| ImageError::Write { source })?;
    Ok((plan, header))
}

/// Decode the header stored at `header_offset` of a combined image
pub fn read_header(image: &[u8], header_offset: u64) -> Result<FirmwareHeader, FormatError> {
    let region = region(image, header_offset, FIRMWARE_HEADER_SIZE as u64, "firmware header")?;
    FirmwareHeader::parse(region)
}

/// Application bytes described by `header`, starting at `app_offset`
pub fn payload<'a>(
    image: &'a [u8],
    header: &FirmwareHeader,
    app_offset: u64,
) -> Result<&'a [u8], FormatError> {
    region(
        image,
        app_offset,
        u64::from(header.total_size.get()),
        "application payload",
    )
}

/// Decode and fully verify the header of a combined image
///
/// The payload digest is only checked when `app_offset` is given.
pub fn verify_image(
    image: &[u8],
    header_offset: u64,
    app_offset: Option<u64>,
    format: &HeaderFormat,
) -> Result<FirmwareHeader, FormatError> {
    let header = read_header(image, header_offset)?;
    header.verify(format)?;

    if let Some(app_offset) = app_offset {
        header.verify_payload(payload(image, &header, app_offset)?)?;
    }

    Ok(header)
}

/// Outcome of one inspection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    /// Short name of the check
    pub name: &'static str,
    /// Whether the check passed
    pub passed: bool,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Check {
    fn from_result(name: &'static str, result: Result<(), FormatError>) -> Self {
        Self {
            name,
            passed: result.is_ok(),
            detail: result.err().map(|e| e.to_string()),
        }
    }
}

/// Decoded header of a combined image with every check run
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    /// Decoded header
    #[serde(skip)]
    pub header: FirmwareHeader,
    /// Header fields for display
    pub fields: HeaderSummary,
    /// Check outcomes, in the order they were run
    pub checks: Vec<Check>,
}

impl ImageReport {
    /// Whether every check passed
    pub fn is_valid(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }
}

/// Decode the header of a combined image and run every check on it
///
/// Unlike [`verify_image`], a failing check does not stop the others. Only an
/// image too short to hold the header is an error.
pub fn inspect(
    image: &[u8],
    header_offset: u64,
    app_offset: Option<u64>,
    format: &HeaderFormat,
) -> Result<ImageReport, FormatError> {
    let header = read_header(image, header_offset)?;

    let mut checks = vec![
        Check::from_result("magic", header.check_magic(format)),
        Check::from_result("version", header.check_version(format)),
        Check::from_result("checksum", header.check_checksum()),
    ];
    if let Some(app_offset) = app_offset {
        let digest = payload(image, &header, app_offset).and_then(|p| header.verify_payload(p));
        checks.push(Check::from_result("digest", digest));
    }

    Ok(ImageReport {
        fields: HeaderSummary::from(&header),
        header,
        checks,
    })
}

fn region<'a>(
    image: &'a [u8],
    offset: u64,
    len: u64,
    what: &'static str,
) -> Result<&'a [u8], FormatError> {
    let truncated = || FormatError::Truncated {
        what,
        offset,
        needed: len,
        available: (image.len() as u64).saturating_sub(offset),
    };

    let start = usize::try_from(offset).map_err(|_| truncated())?;
    let end = offset
        .checked_add(len)
        .and_then(|end| usize::try_from(end).ok())
        .ok_or_else(truncated)?;

    image.get(start..end).ok_or_else(truncated)
}
