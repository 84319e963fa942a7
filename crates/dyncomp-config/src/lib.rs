//! # Dyncomp Configuration
//!
//! Compression strategy configuration with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Environment variable expansion
//! - Layered defaults (override, strategy, legacy flag, constant)
//! - Validation
//! - Merging of layered files

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod builder;
pub mod loader;
pub mod merger;
pub mod resolve;
pub mod types;
pub mod validator;

pub use builder::SettingsBuilder;
pub use loader::{load_and_merge, load_config, load_from_file, load_from_str};
pub use merger::merge_settings;
pub use resolve::ResolvedStrategy;
pub use types::{
    CompressionSettings, CompressionStrategy, BROTLI_DEFAULT_LEVEL, BROTLI_MAX_LEVEL,
    DYNAMIC_GZIP_DEFAULT, GZIP_DEFAULT_LEVEL, GZIP_MAX_LEVEL,
};
pub use validator::validate_settings;

use dyncomp_core::{Error, Result};
use std::path::Path;

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Config("Unable to detect config format".to_string()))?;

        match ext {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(Error::Config(format!("Unsupported config format: {}", ext))),
        }
    }
}
