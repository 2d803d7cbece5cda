//! Configuration constants
//!
//! Named constants shared by the core and CLI layers. User-tunable values
//! live in [`crate::core::settings`]; this module only holds the built-in
//! defaults those settings fall back to.

pub mod defaults;
