//! Compression middleware implementation

use crate::decision::CompressionDecision;
use crate::encoder::StreamEncoder;
use crate::policy::NegotiationPolicy;
use async_trait::async_trait;
use bytes::Bytes;
use dyncomp_config::CompressionSettings;
use dyncomp_core::middleware::{Body, Middleware, Next};
use dyncomp_core::{BufferedResponse, CompressionOverride, Result};
use http::header::{CONTENT_ENCODING, CONTENT_LENGTH, TRANSFER_ENCODING, VARY};
use http::{HeaderValue, Request, Response};
use http_body_util::BodyExt;
use tracing::debug;

/// Compression middleware
///
/// Buffers the inner response, negotiates an encoding against the request's
/// `Accept-Encoding`, and re-emits the body encoded. Responses that already
/// carry `Content-Encoding` pass through untouched.
#[derive(Debug, Clone)]
pub struct CompressionMiddleware {
    policy: NegotiationPolicy,
    encoder: StreamEncoder,
}

impl CompressionMiddleware {
    /// Create a new compression middleware
    pub fn new(settings: CompressionSettings) -> Self {
        Self::with_policy(NegotiationPolicy::new(settings))
    }

    /// Create a compression middleware from an existing policy
    pub fn with_policy(policy: NegotiationPolicy) -> Self {
        Self {
            policy,
            encoder: StreamEncoder::new(),
        }
    }
}

#[async_trait]
impl Middleware for CompressionMiddleware {
    async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>> {
        let request_headers = req.headers().clone();

        let response = next.run(req).await?;

        if response.headers().contains_key(CONTENT_ENCODING) {
            return Ok(response);
        }

        let (mut parts, body) = response.into_parts();
        let body_bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(never) => match never {},
        };

        let ctx = BufferedResponse::new(request_headers)
            .with_body(body_bytes.clone())
            .with_override(parts.extensions.get::<CompressionOverride>().copied());

        let decision = self.policy.decide(&ctx);
        if decision == CompressionDecision::NoCompression {
            return Ok(Response::from_parts(parts, Body::new(body_bytes)));
        }

        let original_size = body_bytes.len();
        let mut encoded = Vec::with_capacity(original_size / 2);
        self.encoder.apply(
            decision,
            &mut &body_bytes[..],
            &mut encoded,
            &mut parts.headers,
        )?;

        debug!(
            decision = %decision,
            original_size,
            compressed_size = encoded.len(),
            "Response compressed"
        );

        parts
            .headers
            .append(VARY, HeaderValue::from_static("accept-encoding"));
        parts
            .headers
            .insert(CONTENT_LENGTH, HeaderValue::from(encoded.len()));
        // Length is known now; chunked framing no longer applies
        parts.headers.remove(TRANSFER_ENCODING);

        Ok(Response::from_parts(parts, Body::new(Bytes::from(encoded))))
    }
}
