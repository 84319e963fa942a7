//! Configuration types

use serde::{Deserialize, Serialize};

/// Default gzip level when none is configured
pub const GZIP_DEFAULT_LEVEL: u32 = 6;

/// Default brotli quality when none is configured
pub const BROTLI_DEFAULT_LEVEL: u32 = 4;

/// Highest valid gzip level
pub const GZIP_MAX_LEVEL: u32 = 9;

/// Highest valid brotli quality
pub const BROTLI_MAX_LEVEL: u32 = 11;

/// Legacy gzip flag when no settings file sets it
pub const DYNAMIC_GZIP_DEFAULT: bool = true;

/// Per-algorithm enablement and quality for dynamic compression
///
/// Every field may be left unset. Unset fields fall back to the legacy
/// gzip flag (gzip enablement only) or to the default constants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompressionStrategy {
    /// Enable gzip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gzip_enabled: Option<bool>,

    /// Gzip level (0-9)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gzip_level: Option<u32>,

    /// Enable brotli
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brotli_enabled: Option<bool>,

    /// Brotli quality (0-11)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brotli_level: Option<u32>,
}

impl CompressionStrategy {
    /// Enable or disable gzip and brotli at the default levels
    pub fn new(brotli_enabled: bool, gzip_enabled: bool) -> Self {
        Self::with_levels(
            brotli_enabled,
            BROTLI_DEFAULT_LEVEL,
            gzip_enabled,
            GZIP_DEFAULT_LEVEL,
        )
    }

    /// Enable or disable gzip and brotli with custom levels
    ///
    /// Levels outside the valid range are clamped.
    pub fn with_levels(
        brotli_enabled: bool,
        brotli_level: u32,
        gzip_enabled: bool,
        gzip_level: u32,
    ) -> Self {
        Self {
            gzip_enabled: Some(gzip_enabled),
            gzip_level: Some(clamp_gzip_level(gzip_level)),
            brotli_enabled: Some(brotli_enabled),
            brotli_level: Some(clamp_brotli_level(brotli_level)),
        }
    }
}

/// Dynamic compression settings of a server
///
/// `dynamic_gzip` stays unset until resolution so merged files only
/// override it when they actually name it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompressionSettings {
    /// Legacy global gzip switch, consulted only when no strategy sets gzip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_gzip: Option<bool>,

    /// Explicit strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<CompressionStrategy>,
}

impl CompressionSettings {
    /// Settings driven only by the legacy gzip flag
    pub fn legacy(dynamic_gzip: bool) -> Self {
        Self {
            dynamic_gzip: Some(dynamic_gzip),
            strategy: None,
        }
    }

    /// Settings with an explicit strategy
    pub fn with_strategy(strategy: CompressionStrategy) -> Self {
        Self {
            strategy: Some(strategy),
            ..Self::default()
        }
    }

    /// Effective legacy gzip flag, `true` when unset
    pub fn dynamic_gzip(&self) -> bool {
        self.dynamic_gzip.unwrap_or(DYNAMIC_GZIP_DEFAULT)
    }
}

pub(crate) fn clamp_gzip_level(level: u32) -> u32 {
    level.min(GZIP_MAX_LEVEL)
}

pub(crate) fn clamp_brotli_level(level: u32) -> u32 {
    level.min(BROTLI_MAX_LEVEL)
}
