//! Compression decision types

use std::fmt;

/// Content codings this layer can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// gzip (RFC 1952)
    Gzip,
    /// Brotli (RFC 7932)
    Brotli,
}

impl Encoding {
    /// Get the Content-Encoding header value
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Gzip => "gzip",
            Encoding::Brotli => "br",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of negotiation for a single response
///
/// At most one algorithm applies per response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionDecision {
    /// Send the body as is
    NoCompression,
    /// Gzip at the given level
    Gzip(u32),
    /// Brotli at the given quality
    Brotli(u32),
}

impl CompressionDecision {
    /// Selected encoding, if any
    pub fn encoding(&self) -> Option<Encoding> {
        match self {
            CompressionDecision::NoCompression => None,
            CompressionDecision::Gzip(_) => Some(Encoding::Gzip),
            CompressionDecision::Brotli(_) => Some(Encoding::Brotli),
        }
    }

    /// Selected level, if any
    pub fn level(&self) -> Option<u32> {
        match *self {
            CompressionDecision::NoCompression => None,
            CompressionDecision::Gzip(level) | CompressionDecision::Brotli(level) => Some(level),
        }
    }

    /// Content-Encoding header value this decision produces
    pub fn content_encoding(&self) -> Option<&'static str> {
        self.encoding().map(|e| e.as_str())
    }

    /// Whether the body will be transformed
    pub fn is_compressed(&self) -> bool {
        self.encoding().is_some()
    }
}

impl fmt::Display for CompressionDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionDecision::NoCompression => f.write_str("identity"),
            CompressionDecision::Gzip(level) => write!(f, "gzip(level={level})"),
            CompressionDecision::Brotli(level) => write!(f, "br(level={level})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_name() {
        assert_eq!(Encoding::Gzip.as_str(), "gzip");
        assert_eq!(Encoding::Brotli.to_string(), "br");
    }

    #[test]
    fn test_decision_accessors() {
        let none = CompressionDecision::NoCompression;
        assert_eq!(none.encoding(), None);
        assert_eq!(none.level(), None);
        assert!(!none.is_compressed());

        let gzip = CompressionDecision::Gzip(6);
        assert_eq!(gzip.content_encoding(), Some("gzip"));
        assert_eq!(gzip.level(), Some(6));

        let br = CompressionDecision::Brotli(4);
        assert_eq!(br.encoding(), Some(Encoding::Brotli));
        assert_eq!(br.to_string(), "br(level=4)");
    }
}
