//! Error types for the API client
//!
//! Every call resolves to either a value or a [`FincodeError`], which is one of
//! two kinds:
//!
//! - [`ApiError`]: the API answered with a non-2xx status and a JSON error payload
//! - [`SdkError`]: something failed locally (transport fault, unparseable body,
//!   invalid configuration)

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, FincodeError>;

/// Top-level error returned by every client operation
#[derive(Error, Debug)]
pub enum FincodeError {
    /// The API rejected the request
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request failed before a well-formed API answer was obtained
    #[error(transparent)]
    Sdk(#[from] SdkError),
}

impl FincodeError {
    /// Check if this is an API-level rejection
    #[must_use]
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    /// Check if this is a local/transport failure
    #[must_use]
    pub fn is_sdk(&self) -> bool {
        matches!(self, Self::Sdk(_))
    }

    /// Borrow the API error, if any
    #[must_use]
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            Self::Sdk(_) => None,
        }
    }

    /// Borrow the SDK error, if any
    #[must_use]
    pub fn as_sdk(&self) -> Option<&SdkError> {
        match self {
            Self::Sdk(e) => Some(e),
            Self::Api(_) => None,
        }
    }
}

/// A single entry of the `errors` array in an error payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code, e.g. `E01100002`
    #[serde(default)]
    pub error_code: String,
    /// Human-readable description
    #[serde(default)]
    pub error_message: String,
}

/// Error payload returned by the API on a non-2xx status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Structured error list from the payload
    pub errors: Vec<ErrorDetail>,
    /// Top-level message, when the payload carried one
    pub message: Option<String>,
    /// Whether the payload carried a top-level message
    pub has_message: bool,
}

impl ApiError {
    /// Create an API error from its parts
    pub fn new(status: u16, errors: Vec<ErrorDetail>, message: Option<String>) -> Self {
        let has_message = message.is_some();
        Self {
            status,
            errors,
            message,
            has_message,
        }
    }

    /// Error codes in payload order
    pub fn error_codes(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.error_code.as_str())
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error ({})", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {message}")?;
        }
        for detail in &self.errors {
            write!(f, " [{}] {}", detail.error_code, detail.error_message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Local failures: anything that is not a well-formed API rejection
#[derive(Error, Debug)]
pub enum SdkError {
    /// The network exchange itself failed (DNS, TLS, connection reset, timeout)
    #[error("fetch failed: {0}")]
    FetchFailed(#[source] reqwest::Error),

    /// The response body was not valid JSON
    #[error("response parse failed (status {status}): {source}")]
    ParseFailed {
        /// HTTP status of the unparseable response
        status: u16,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The JSON body did not match the declared response type
    #[error("response decode failed: {0}")]
    DecodeFailed(#[source] serde_json::Error),

    /// The request body could not be encoded
    #[error("request serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Query serializer was handed a value it cannot place under a key
    #[error("query serialization failed: {0}")]
    Query(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// A header value contained characters HTTP does not allow
    #[error("Invalid header value for {name}")]
    InvalidHeader {
        /// Header name
        name: &'static str,
    },
}

impl SdkError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create a query serialization error
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Check if the network exchange failed
    #[must_use]
    pub fn is_fetch_failed(&self) -> bool {
        matches!(self, Self::FetchFailed(_))
    }

    /// Check if the response body could not be parsed as JSON
    #[must_use]
    pub fn is_parse_failed(&self) -> bool {
        matches!(self, Self::ParseFailed { .. })
    }

    /// Check if the failure came from a transport timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::FetchFailed(e) if e.is_timeout())
    }
}
