//! Core business logic module
//!
//! This module contains the firmware image and JSON logic for fwtools.
//! Apart from settings loading it does no I/O; that belongs in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`header`] - Firmware metadata header construction and decoding
//! - [`image`] - Combined bootloader + application image layout
//! - [`document`] - JSON parsing and pretty-printing
//! - [`merge`] - Recursive JSON merge
//! - [`keypath`] - Dotted key paths into JSON documents
//! - [`logcheck`] - Expected-output checks for captured logs
//! - [`settings`] - Layered TOML settings

pub mod document;
pub mod header;
pub mod image;
pub mod keypath;
pub mod logcheck;
pub mod merge;
pub mod settings;
