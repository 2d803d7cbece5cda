//! Infrastructure layer
//!
//! Handles filesystem access and platform directories.
//! This module is the only place where side effects occur.

pub mod dirs;
pub mod filesystem;
