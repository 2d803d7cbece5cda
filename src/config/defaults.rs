//! Default configuration values

/// Magic code identifying the firmware metadata header
pub const FIRMWARE_HEADER_MAGIC: u32 = 0x5a51_b3d4;

/// Revision of the firmware metadata header layout
pub const FIRMWARE_HEADER_VERSION: u32 = 1;

/// Size in bytes of a SHA-256 digest
pub const SHA256_SIZE: usize = 32;

/// Indentation used when pretty-printing JSON documents
pub const JSON_INDENT: usize = 4;

/// Project-local settings file, looked up in the working directory
pub const PROJECT_SETTINGS_FILE: &str = "fwtools.toml";

/// Global settings file, looked up in the config directory
pub const GLOBAL_SETTINGS_FILE: &str = "config.toml";

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "FWTOOLS_CONFIG_DIR";

/// Environment variable naming an explicit settings file
pub const ENV_CONFIG_FILE: &str = "FWTOOLS_CONFIG";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
