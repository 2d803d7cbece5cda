//! fwtools - Firmware image and configuration tools
//!
//! This library builds combined bootloader + application firmware images
//! behind a 56-byte metadata header, and provides the JSON and log utilities
//! that surround a firmware build.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic (headers, images, JSON, log checks, settings)
//! - [`infra`] - Infrastructure layer (filesystem, platform directories)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
