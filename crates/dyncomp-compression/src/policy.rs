//! Accept-Encoding negotiation policy

use crate::decision::{CompressionDecision, Encoding};
use dyncomp_config::CompressionSettings;
use dyncomp_core::ResponseContext;
use http::header::ACCEPT_ENCODING;
use std::sync::Arc;
use tracing::debug;

/// Bodies at or below this many bytes are never compressed
///
/// Roughly one Ethernet MTU.
pub const MIN_COMPRESSIBLE_SIZE: u64 = 1500;

/// Decide how to encode a response
///
/// Brotli is checked first and wins whenever both algorithms qualify. Size and
/// client acceptance are required for either algorithm, whatever the
/// enablement source.
pub fn decide<C>(ctx: &C, settings: &CompressionSettings) -> CompressionDecision
where
    C: ResponseContext + ?Sized,
{
    let size = match ctx.body_available_bytes() {
        Ok(size) => size,
        Err(e) => {
            debug!(error = %e, "Body size unavailable, treating as empty");
            0
        }
    };
    let exceeds_threshold = size > MIN_COMPRESSIBLE_SIZE;

    let accept_encoding = ctx.header(ACCEPT_ENCODING.as_str()).unwrap_or_default();
    let resolved = settings.resolve(ctx.compression_override().as_ref());

    let decision = if resolved.brotli_enabled
        && exceeds_threshold
        && client_accepts(&accept_encoding, Encoding::Brotli)
    {
        CompressionDecision::Brotli(resolved.brotli_level)
    } else if resolved.gzip_enabled
        && exceeds_threshold
        && client_accepts(&accept_encoding, Encoding::Gzip)
    {
        CompressionDecision::Gzip(resolved.gzip_level)
    } else {
        CompressionDecision::NoCompression
    };

    debug!(
        size,
        accept_encoding = %accept_encoding,
        decision = %decision,
        "Compression negotiated"
    );

    decision
}

/// Case-insensitive substring match of the encoding token in `Accept-Encoding`
///
/// Quality values and wildcards are not parsed.
pub fn client_accepts(accept_encoding: &str, encoding: Encoding) -> bool {
    accept_encoding
        .to_ascii_lowercase()
        .contains(encoding.as_str())
}

/// Negotiation policy over shared, read-only settings
#[derive(Debug, Clone, Default)]
pub struct NegotiationPolicy {
    settings: Arc<CompressionSettings>,
}

impl NegotiationPolicy {
    /// Create a policy owning its settings
    pub fn new(settings: CompressionSettings) -> Self {
        Self::from_shared(Arc::new(settings))
    }

    /// Create a policy over settings shared with other components
    pub fn from_shared(settings: Arc<CompressionSettings>) -> Self {
        Self { settings }
    }

    /// Settings this policy reads
    pub fn settings(&self) -> &CompressionSettings {
        &self.settings
    }

    /// Decide how to encode a response
    pub fn decide<C>(&self, ctx: &C) -> CompressionDecision
    where
        C: ResponseContext + ?Sized,
    {
        decide(ctx, &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dyncomp_config::{CompressionStrategy, BROTLI_DEFAULT_LEVEL, GZIP_DEFAULT_LEVEL};
    use dyncomp_core::CompressionOverride;
    use proptest::prelude::*;
    use std::io;

    #[derive(Debug, Default)]
    struct StubContext {
        size: Option<u64>,
        accept_encoding: Option<String>,
        overrides: Option<CompressionOverride>,
    }

    impl StubContext {
        fn new(size: u64, accept_encoding: Option<&str>) -> Self {
            Self {
                size: Some(size),
                accept_encoding: accept_encoding.map(str::to_owned),
                overrides: None,
            }
        }
    }

    impl ResponseContext for StubContext {
        fn body_available_bytes(&self) -> io::Result<u64> {
            self.size
                .ok_or_else(|| io::Error::new(io::ErrorKind::Unsupported, "no length"))
        }

        fn header(&self, name: &str) -> Option<String> {
            name.eq_ignore_ascii_case("accept-encoding")
                .then(|| self.accept_encoding.clone())
                .flatten()
        }

        fn compression_override(&self) -> Option<CompressionOverride> {
            self.overrides
        }
    }

    fn both_enabled() -> CompressionSettings {
        CompressionSettings::with_strategy(CompressionStrategy::new(true, true))
    }

    #[test]
    fn test_client_accepts() {
        assert!(client_accepts("gzip, deflate, br", Encoding::Brotli));
        assert!(client_accepts("GZIP", Encoding::Gzip));
        assert!(client_accepts("Br;q=0.5", Encoding::Brotli));
        assert!(!client_accepts("deflate", Encoding::Gzip));
        assert!(!client_accepts("", Encoding::Brotli));
    }

    #[test]
    fn test_brotli_preferred_over_gzip() {
        let ctx = StubContext::new(2000, Some("gzip, br"));
        assert_eq!(
            decide(&ctx, &both_enabled()),
            CompressionDecision::Brotli(BROTLI_DEFAULT_LEVEL)
        );
    }

    #[test]
    fn test_gzip_when_client_lacks_brotli() {
        let ctx = StubContext::new(2000, Some("gzip"));
        assert_eq!(
            decide(&ctx, &both_enabled()),
            CompressionDecision::Gzip(GZIP_DEFAULT_LEVEL)
        );
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let settings = both_enabled();
        assert_eq!(
            decide(&StubContext::new(1500, Some("gzip, br")), &settings),
            CompressionDecision::NoCompression
        );
        assert!(decide(&StubContext::new(1501, Some("gzip, br")), &settings).is_compressed());
    }

    #[test]
    fn test_small_body_with_gzip_enabled() {
        let settings = CompressionSettings::with_strategy(CompressionStrategy {
            gzip_enabled: Some(true),
            ..CompressionStrategy::default()
        });
        let ctx = StubContext::new(100, Some("gzip"));
        assert_eq!(decide(&ctx, &settings), CompressionDecision::NoCompression);
    }

    #[test]
    fn test_missing_header_fails_closed() {
        let ctx = StubContext::new(10_000, None);
        assert_eq!(decide(&ctx, &both_enabled()), CompressionDecision::NoCompression);
    }

    #[test]
    fn test_unknown_size_is_treated_as_zero() {
        let ctx = StubContext {
            size: None,
            accept_encoding: Some("gzip, br".to_string()),
            overrides: None,
        };
        assert_eq!(decide(&ctx, &both_enabled()), CompressionDecision::NoCompression);
    }

    #[test]
    fn test_legacy_flag_without_strategy() {
        let ctx = StubContext::new(5000, Some("gzip, br"));

        assert_eq!(
            decide(&ctx, &CompressionSettings::legacy(true)),
            CompressionDecision::Gzip(GZIP_DEFAULT_LEVEL)
        );
        assert_eq!(
            decide(&ctx, &CompressionSettings::legacy(false)),
            CompressionDecision::NoCompression
        );
    }

    #[test]
    fn test_legacy_flag_still_requires_size_and_header() {
        let settings = CompressionSettings::legacy(true);
        assert_eq!(
            decide(&StubContext::new(10, Some("gzip")), &settings),
            CompressionDecision::NoCompression
        );
        assert_eq!(
            decide(&StubContext::new(5000, Some("identity")), &settings),
            CompressionDecision::NoCompression
        );
    }

    #[test]
    fn test_unset_brotli_does_not_inherit_legacy_flag() {
        let settings = CompressionSettings {
            dynamic_gzip: Some(true),
            strategy: Some(CompressionStrategy::default()),
        };
        let ctx = StubContext::new(5000, Some("br"));
        assert_eq!(decide(&ctx, &settings), CompressionDecision::NoCompression);
    }

    #[test]
    fn test_empty_strategy_with_legacy_flag_off() {
        let settings = CompressionSettings {
            dynamic_gzip: Some(false),
            strategy: Some(CompressionStrategy::default()),
        };
        let ctx = StubContext::new(5000, Some("gzip, br"));
        assert_eq!(decide(&ctx, &settings), CompressionDecision::NoCompression);
    }

    #[test]
    fn test_configured_levels() {
        let settings = CompressionSettings::with_strategy(CompressionStrategy::with_levels(
            true, 9, true, 2,
        ));
        assert_eq!(
            decide(&StubContext::new(5000, Some("br")), &settings),
            CompressionDecision::Brotli(9)
        );
        assert_eq!(
            decide(&StubContext::new(5000, Some("gzip")), &settings),
            CompressionDecision::Gzip(2)
        );
    }

    #[test]
    fn test_override_disables_compression() {
        let ctx = StubContext {
            overrides: Some(CompressionOverride::disabled()),
            ..StubContext::new(5000, Some("gzip, br"))
        };
        assert_eq!(decide(&ctx, &both_enabled()), CompressionDecision::NoCompression);
    }

    #[test]
    fn test_policy_shares_settings() {
        let settings = Arc::new(both_enabled());
        let policy = NegotiationPolicy::from_shared(Arc::clone(&settings));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let policy = policy.clone();
                std::thread::spawn(move || policy.decide(&StubContext::new(4096, Some("gzip"))))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), CompressionDecision::Gzip(GZIP_DEFAULT_LEVEL));
        }
        assert_eq!(policy.settings(), settings.as_ref());
    }

    fn any_settings() -> impl Strategy<Value = CompressionSettings> {
        (
            proptest::option::of(any::<bool>()),
            proptest::option::of((
                proptest::option::of(any::<bool>()),
                proptest::option::of(0u32..=9),
                proptest::option::of(any::<bool>()),
                proptest::option::of(0u32..=11),
            )),
        )
            .prop_map(|(dynamic_gzip, strategy)| CompressionSettings {
                dynamic_gzip,
                strategy: strategy.map(|(gzip_enabled, gzip_level, brotli_enabled, brotli_level)| {
                    CompressionStrategy {
                        gzip_enabled,
                        gzip_level,
                        brotli_enabled,
                        brotli_level,
                    }
                }),
            })
    }

    proptest! {
        #[test]
        fn prop_small_bodies_never_compressed(
            size in 0u64..=MIN_COMPRESSIBLE_SIZE,
            accept in "(gzip|br|deflate|identity|\\*|, |;q=0\\.[0-9]){0,6}",
            settings in any_settings(),
        ) {
            let ctx = StubContext::new(size, Some(&accept));
            prop_assert_eq!(decide(&ctx, &settings), CompressionDecision::NoCompression);
        }

        #[test]
        fn prop_missing_header_never_compressed(
            size in any::<u64>(),
            settings in any_settings(),
        ) {
            let ctx = StubContext::new(size, None);
            prop_assert_eq!(decide(&ctx, &settings), CompressionDecision::NoCompression);
        }

        #[test]
        fn prop_brotli_wins_when_eligible(
            size in (MIN_COMPRESSIBLE_SIZE + 1)..1_000_000u64,
            level in 0u32..=11,
            gzip_enabled in any::<bool>(),
        ) {
            let settings = CompressionSettings::with_strategy(CompressionStrategy {
                gzip_enabled: Some(gzip_enabled),
                brotli_enabled: Some(true),
                brotli_level: Some(level),
                ..CompressionStrategy::default()
            });
            let ctx = StubContext::new(size, Some("gzip, deflate, BR"));
            prop_assert_eq!(decide(&ctx, &settings), CompressionDecision::Brotli(level));
        }
    }
}
