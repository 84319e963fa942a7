//! # Dyncomp Core
//!
//! Core types, traits, and error handling for dynamic response compression.
//!
//! This crate provides the contracts the compression layer consumes from the host server:
//! - Response context (body size, request headers, per-response overrides)
//! - Header sink for response metadata
//! - Middleware trait
//! - Error types

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod context;
pub mod error;
pub mod middleware;

pub use context::{
    joined_header, BufferedResponse, CompressionOverride, HeaderSink, ResponseContext,
};
pub use error::{Error, Result};
pub use middleware::{Body, Middleware, Next};

// Re-export commonly used HTTP types
pub use bytes::Bytes;
pub use http::{HeaderMap, Request, Response, StatusCode};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::context::{BufferedResponse, CompressionOverride, HeaderSink, ResponseContext};
    pub use crate::error::{Error, Result};
    pub use crate::middleware::{Body, Middleware, Next};
}
