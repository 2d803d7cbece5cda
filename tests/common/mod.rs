//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary working directory plus an isolated config directory,
/// so a developer's own `config.toml` never leaks into a test run.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Temporary global config directory
    pub config_dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            config_dir: TempDir::new().expect("Failed to create config directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a text file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        self.create_bytes(name, content.as_bytes());
    }

    /// Create a binary file in the test project
    pub fn create_bytes(&self, name: &str, content: &[u8]) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Write the global `config.toml`
    pub fn create_global_settings(&self, content: &str) {
        std::fs::write(self.config_dir.path().join("config.toml"), content)
            .expect("Failed to write global settings");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Read a binary file from the test project
    pub fn read_bytes(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// A `fwtools` command running inside the project
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_fwtools"));
        cmd.current_dir(self.path());
        cmd.env("FWTOOLS_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("FWTOOLS_CONFIG");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run `fwtools` with arguments
    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute fwtools")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Stdout of a finished command
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished command
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Bootloader used by the reference scenario
pub const BOOTLOADER: [u8; 4] = [0x00, 0x01, 0x02, 0x03];

/// Application used by the reference scenario
pub const APP: [u8; 3] = [0xaa, 0xbb, 0xcc];

/// SHA-256 of [`APP`]
pub const APP_SHA256: &str = "fa22dfe1da9013b3c1145040acae9089e0c08bc1c1a0719614f4b73add6f6ef5";

/// Header checksum of the reference scenario (version 42)
pub const REFERENCE_CHECKSUM: u32 = 0xc1dd_f7e2;
