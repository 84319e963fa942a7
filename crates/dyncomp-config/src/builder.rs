//! Settings builder

use crate::types::{clamp_brotli_level, clamp_gzip_level, CompressionSettings, CompressionStrategy};
use dyncomp_core::Result;

/// Builder for constructing settings programmatically
///
/// Levels given to the level setters are clamped into their valid range.
/// A complete strategy passed to [`SettingsBuilder::strategy`] is validated as is.
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    dynamic_gzip: Option<bool>,
    strategy: Option<CompressionStrategy>,
}

impl SettingsBuilder {
    /// Create a new settings builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the legacy dynamic gzip flag
    pub fn dynamic_gzip(mut self, enabled: bool) -> Self {
        self.dynamic_gzip = Some(enabled);
        self
    }

    /// Use a complete strategy
    pub fn strategy(mut self, strategy: CompressionStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Enable or disable gzip
    pub fn gzip(mut self, enabled: bool) -> Self {
        self.strategy_mut().gzip_enabled = Some(enabled);
        self
    }

    /// Set the gzip level (clamped to 0-9)
    pub fn gzip_level(mut self, level: u32) -> Self {
        let clamped = clamp_gzip_level(level);
        if clamped != level {
            tracing::debug!(requested = level, clamped, "gzip level clamped");
        }
        self.strategy_mut().gzip_level = Some(clamped);
        self
    }

    /// Enable or disable brotli
    pub fn brotli(mut self, enabled: bool) -> Self {
        self.strategy_mut().brotli_enabled = Some(enabled);
        self
    }

    /// Set the brotli quality (clamped to 0-11)
    pub fn brotli_level(mut self, level: u32) -> Self {
        let clamped = clamp_brotli_level(level);
        if clamped != level {
            tracing::debug!(requested = level, clamped, "brotli level clamped");
        }
        self.strategy_mut().brotli_level = Some(clamped);
        self
    }

    fn strategy_mut(&mut self) -> &mut CompressionStrategy {
        self.strategy.get_or_insert_with(CompressionStrategy::default)
    }

    /// Build the settings
    pub fn build(self) -> Result<CompressionSettings> {
        let settings = CompressionSettings {
            dynamic_gzip: self.dynamic_gzip,
            strategy: self.strategy,
        };

        crate::validator::validate_settings(&settings)?;

        Ok(settings)
    }
}
