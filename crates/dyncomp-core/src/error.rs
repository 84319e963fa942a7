//! Error types for dynamic compression

/// Result type alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for dynamic compression
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The selected encoder could not be constructed
    #[error("Failed to construct {encoding} encoder: {message}")]
    EncoderConstruction {
        /// Content-Encoding token of the encoder
        encoding: &'static str,
        /// Error message
        message: String,
    },

    /// I/O fault while streaming bytes through an encoder
    #[error("{encoding} encoding failed: {source}")]
    Encoding {
        /// Content-Encoding token, or "identity" for uncompressed copies
        encoding: &'static str,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Header name or value rejected by the response metadata sink
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] http::Error),

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an encoding error for the given Content-Encoding token
    pub fn encoding(encoding: &'static str, source: std::io::Error) -> Self {
        Error::Encoding { encoding, source }
    }

    /// Create an encoder construction error
    pub fn construction(encoding: &'static str, message: impl Into<String>) -> Self {
        Error::EncoderConstruction {
            encoding,
            message: message.into(),
        }
    }

    /// Whether this error aborted an encoding pass
    pub fn is_encoding_failure(&self) -> bool {
        matches!(
            self,
            Error::EncoderConstruction { .. } | Error::Encoding { .. }
        )
    }

    /// Convert error to HTTP status code
    pub fn to_status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::InvalidHeader(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
