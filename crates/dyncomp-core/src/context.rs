//! Response context and metadata sinks

use crate::{Error, Result};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use std::io::{self, Cursor};

/// Read-only view of a pending response, as seen by the compression layer
pub trait ResponseContext {
    /// Number of body bytes available before any compression
    fn body_available_bytes(&self) -> io::Result<u64>;

    /// Request header value by name (case-insensitive)
    fn header(&self, name: &str) -> Option<String>;

    /// Per-response override of the configured strategy
    fn compression_override(&self) -> Option<CompressionOverride> {
        None
    }
}

/// Per-response override of compression settings
///
/// Handlers attach this as an `http` response extension. Set fields win over
/// the configured strategy; unset fields fall through to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionOverride {
    /// Force gzip on or off
    pub gzip_enabled: Option<bool>,
    /// Gzip level for this response
    pub gzip_level: Option<u32>,
    /// Force brotli on or off
    pub brotli_enabled: Option<bool>,
    /// Brotli level for this response
    pub brotli_level: Option<u32>,
}

impl CompressionOverride {
    /// Override that disables both algorithms
    pub fn disabled() -> Self {
        Self {
            gzip_enabled: Some(false),
            brotli_enabled: Some(false),
            ..Self::default()
        }
    }
}

/// Every field line of a request header, joined with `", "`
///
/// Lines that are not valid visible ASCII are skipped. `None` when no usable
/// line is present.
pub fn joined_header(headers: &HeaderMap, name: &str) -> Option<String> {
    let values: Vec<&str> = headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();

    (!values.is_empty()).then(|| values.join(", "))
}

/// Response metadata sink
pub trait HeaderSink {
    /// Set (replace) a response header
    fn set_header(&mut self, name: &str, value: &str) -> Result<()>;
}

impl HeaderSink for HeaderMap {
    fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
        self.insert(name, value);
        Ok(())
    }
}

/// In-memory response: request headers plus a fully buffered body
#[derive(Debug, Clone, Default)]
pub struct BufferedResponse {
    request_headers: HeaderMap,
    body: Option<Bytes>,
    override_settings: Option<CompressionOverride>,
}

impl BufferedResponse {
    /// Create a response context for the given request headers
    pub fn new(request_headers: HeaderMap) -> Self {
        Self {
            request_headers,
            body: None,
            override_settings: None,
        }
    }

    /// Set the pending body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a per-response override
    pub fn with_override(mut self, settings: Option<CompressionOverride>) -> Self {
        self.override_settings = settings;
        self
    }

    /// Reader over the pending body, `None` when no body was set
    pub fn body_stream(&self) -> Option<Cursor<Bytes>> {
        self.body.clone().map(Cursor::new)
    }

    /// Request headers
    pub fn request_headers(&self) -> &HeaderMap {
        &self.request_headers
    }
}

impl ResponseContext for BufferedResponse {
    fn body_available_bytes(&self) -> io::Result<u64> {
        Ok(self.body.as_ref().map_or(0, |b| b.len() as u64))
    }

    fn header(&self, name: &str) -> Option<String> {
        joined_header(&self.request_headers, name)
    }

    fn compression_override(&self) -> Option<CompressionOverride> {
        self.override_settings
    }
}
