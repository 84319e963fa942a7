//! Layered resolution of effective compression settings
//!
//! Each field is looked up in priority order:
//! per-response override, explicit strategy, legacy flag (gzip enablement
//! only), then the hardcoded default.

use crate::types::{CompressionSettings, BROTLI_DEFAULT_LEVEL, GZIP_DEFAULT_LEVEL};
use dyncomp_core::CompressionOverride;
use serde::Serialize;

/// Fully resolved settings for a single response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedStrategy {
    /// Gzip enabled
    pub gzip_enabled: bool,
    /// Gzip level
    pub gzip_level: u32,
    /// Brotli enabled
    pub brotli_enabled: bool,
    /// Brotli quality
    pub brotli_level: u32,
}

/// First set layer wins, otherwise the default
pub fn first_set<T: Copy>(layers: &[Option<T>], default: T) -> T {
    layers.iter().flatten().next().copied().unwrap_or(default)
}

impl CompressionSettings {
    /// Resolve the effective settings, optionally under a per-response override
    pub fn resolve(&self, overrides: Option<&CompressionOverride>) -> ResolvedStrategy {
        let strategy = self.strategy.unwrap_or_default();
        let overrides = overrides.copied().unwrap_or_default();

        ResolvedStrategy {
            gzip_enabled: first_set(
                &[
                    overrides.gzip_enabled,
                    strategy.gzip_enabled,
                    Some(self.dynamic_gzip()),
                ],
                false,
            ),
            gzip_level: first_set(
                &[overrides.gzip_level, strategy.gzip_level],
                GZIP_DEFAULT_LEVEL,
            ),
            brotli_enabled: first_set(
                &[overrides.brotli_enabled, strategy.brotli_enabled],
                false,
            ),
            brotli_level: first_set(
                &[overrides.brotli_level, strategy.brotli_level],
                BROTLI_DEFAULT_LEVEL,
            ),
        }
    }
}
