//! Error types for fwtools
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Image layout errors
///
/// Raised while planning an image, before any byte reaches the output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Header would start inside the bootloader
    #[error(
        "Header offset 0x{header_offset:x} overlaps the bootloader \
         (bootloader ends at 0x{bootloader_len:x})"
    )]
    HeaderOverlapsBootloader {
        header_offset: u64,
        bootloader_len: u64,
    },

    /// Application would start inside the header
    #[error(
        "Application offset 0x{app_offset:x} overlaps the firmware header \
         (header ends at 0x{header_end:x})"
    )]
    AppOverlapsHeader { app_offset: u64, header_end: u64 },

    /// Offsets do not fit the address space of this host
    #[error("Image layout exceeds addressable size at offset 0x{offset:x}")]
    OutOfRange { offset: u64 },
}

/// Firmware header format errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Payload length does not fit the 32-bit size field
    #[error("Application payload is {size} bytes, the header can describe at most {max}")]
    PayloadTooLarge { size: u64, max: u64 },

    /// Image ends before the requested region
    #[error("Image is truncated: {what} needs {needed} bytes at 0x{offset:x}, only {available} available")]
    Truncated {
        what: &'static str,
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// Magic code mismatch
    #[error("Bad header magic: expected 0x{expected:08x}, found 0x{found:08x}")]
    BadMagic { expected: u32, found: u32 },

    /// Header revision mismatch
    #[error("Unsupported header version {found} (expected {expected})")]
    UnsupportedVersion { expected: u32, found: u32 },

    /// Header checksum mismatch
    #[error("Header checksum mismatch: stored 0x{stored:08x}, computed 0x{computed:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    /// Payload digest mismatch
    #[error("Application digest mismatch: header has {expected}, payload hashes to {actual}")]
    DigestMismatch { expected: String, actual: String },
}

/// Image building errors
#[derive(Error, Debug)]
pub enum ImageError {
    /// Layout error
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Format error
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Output sink failed
    #[error("Failed to write image: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },
}

/// JSON document errors
#[derive(Error, Debug)]
pub enum JsonError {
    /// Document is not valid JSON
    #[error("{name} is not valid JSON: {error}")]
    Parse { name: String, error: String },

    /// Intermediate key missing while walking a key path
    #[error("'{key}' not found among keys: {}", format_keys(.available))]
    KeyNotFound { key: String, available: Vec<String> },

    /// Intermediate value is not an object
    #[error("'{key}' is not an object, cannot descend into it")]
    NotAnObject { key: String },

    /// Key path is empty or contains an empty segment
    #[error("Invalid key path '{path}': segments must not be empty")]
    EmptyKeyPath { path: String },

    /// Serialization failed
    #[error("Failed to serialize JSON: {error}")]
    Serialize { error: String },
}

/// Log comparison errors
#[derive(Error, Debug)]
pub enum LogCheckError {
    /// Expected line is not a valid regular expression
    #[error("Invalid pattern '{pattern}' on line {line}: {error}")]
    InvalidPattern {
        line: usize,
        pattern: String,
        error: String,
    },
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("Failed to read settings file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse settings file
    #[error("Failed to parse settings file '{path}': {error}")]
    ParseError { path: String, error: String },

    /// Explicitly requested settings file does not exist
    #[error("Settings file '{path}' does not exist")]
    NotFound { path: String },

    /// A setting holds a value outside its domain
    #[error("Invalid setting '{key}': {error}")]
    InvalidValue { key: String, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

fn format_keys(keys: &[String]) -> String {
    format!("[{}]", keys.iter().map(|k| format!("'{k}'")).collect::<Vec<_>>().join(", "))
}
