//! Dynamic response compression
//!
//! Decides per response whether and how to compress, then performs the
//! compression as a transformation between the body and the network sink:
//! - brotli (preferred when enabled and accepted)
//! - gzip (enabled by strategy or by the legacy `dynamic_gzip` flag)
//!
//! Rules:
//! - Bodies of 1500 bytes or less are never compressed
//! - No `Accept-Encoding` header means no compression
//! - At most one encoding is applied, and `Content-Encoding` is only set
//!   when that encoding actually ran

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod decision;
pub mod encoder;
pub mod middleware;
pub mod policy;

pub use decision::{CompressionDecision, Encoding};
pub use encoder::{EncoderGuard, Finalize, StreamEncoder};
pub use middleware::CompressionMiddleware;
pub use policy::{client_accepts, decide, NegotiationPolicy, MIN_COMPRESSIBLE_SIZE};
