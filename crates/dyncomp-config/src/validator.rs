//! Configuration validation

use crate::types::{CompressionSettings, BROTLI_MAX_LEVEL, GZIP_MAX_LEVEL};
use dyncomp_core::{Error, Result};

/// Validate compression settings
pub fn validate_settings(settings: &CompressionSettings) -> Result<()> {
    let Some(strategy) = settings.strategy else {
        return Ok(());
    };

    if let Some(level) = strategy.gzip_level {
        if level > GZIP_MAX_LEVEL {
            return Err(Error::Config(format!(
                "gzip_level {level} out of range (must be 0..={GZIP_MAX_LEVEL})"
            )));
        }
        if level == 0 {
            tracing::warn!("gzip_level is 0, gzip responses will be stored uncompressed");
        }
    }

    if let Some(level) = strategy.brotli_level {
        if level > BROTLI_MAX_LEVEL {
            return Err(Error::Config(format!(
                "brotli_level {level} out of range (must be 0..={BROTLI_MAX_LEVEL})"
            )));
        }
        if level >= 10 {
            tracing::warn!(level, "brotli_level is very high for dynamic responses");
        }
    }

    if strategy.gzip_enabled.is_some() && !settings.dynamic_gzip() {
        tracing::debug!("strategy sets gzip_enabled, legacy dynamic_gzip flag is ignored");
    }

    Ok(())
}
