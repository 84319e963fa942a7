//! Settings merging
//!
//! Later settings override earlier ones. Every field is merged on its own, so
//! an overlay that only sets `brotli_enabled` keeps the base levels and the
//! base legacy flag.

use crate::types::{CompressionSettings, CompressionStrategy};
use dyncomp_core::{Error, Result};

/// Merge multiple settings together, later entries winning
pub fn merge_settings(settings: Vec<CompressionSettings>) -> Result<CompressionSettings> {
    let mut iter = settings.into_iter();
    let first = iter
        .next()
        .ok_or_else(|| Error::Config("No settings to merge".to_string()))?;

    Ok(iter.fold(first, merge_two))
}

fn merge_two(base: CompressionSettings, overlay: CompressionSettings) -> CompressionSettings {
    let strategy = match (base.strategy, overlay.strategy) {
        (Some(base), Some(overlay)) => Some(merge_strategy(base, overlay)),
        (base, overlay) => overlay.or(base),
    };

    CompressionSettings {
        dynamic_gzip: overlay.dynamic_gzip.or(base.dynamic_gzip),
        strategy,
    }
}

fn merge_strategy(base: CompressionStrategy, overlay: CompressionStrategy) -> CompressionStrategy {
    CompressionStrategy {
        gzip_enabled: overlay.gzip_enabled.or(base.gzip_enabled),
        gzip_level: overlay.gzip_level.or(base.gzip_level),
        brotli_enabled: overlay.brotli_enabled.or(base.brotli_enabled),
        brotli_level: overlay.brotli_level.or(base.brotli_level),
    }
}
