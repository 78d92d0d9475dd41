//! Error types for HTTP calls.
//!
//! Every recoverable failure is returned to the caller as an [`Error`]. The
//! variants are grouped into the categories of [`ErrorKind`] so callers can tell
//! "the request was never sent" apart from "the request failed" and "the
//! response could not be decoded".

use http::StatusCode;

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The call was rejected before a request was built (empty host, bad method, bad URL).
    Validation,
    /// A header, content type or transport could not be configured.
    Configuration,
    /// The request body could not be serialized or compressed.
    Encoding,
    /// The transport failed, the deadline expired or the call was cancelled.
    Transport,
    /// The response arrived but could not be decoded into the target.
    Decode,
}

/// The main error type for HTTP calls.
///
/// # Examples
///
/// ```no_run
/// use fluentcall::{CallContext, Error, HttpCall};
///
/// # async fn example() -> Result<(), Error> {
/// let mut call = HttpCall::new(reqwest::Client::new(), "https://api.example.com");
/// call.method("GET").path("/users/123");
///
/// let mut user = serde_json::Value::Null;
/// let result = call.execute_and_decode(&CallContext::background(), &mut user).await;
/// match result {
///     Ok(response) => println!("status {}: {}", response.status_code, user),
///     Err(Error::DeserializationFailed { raw_response, serde_error, .. }) => {
///         eprintln!("Failed to decode. Raw response: {}", raw_response);
///         eprintln!("Serde error: {}", serde_error);
///     }
///     Err(e) => eprintln!("Request failed: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The call has no host to send to.
    #[error("empty host")]
    EmptyHost,

    /// No HTTP method was configured.
    #[error("empty method")]
    EmptyMethod,

    /// The configured method is not one of GET, POST, PUT, DELETE or PATCH.
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    /// The assembled host, path and query do not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid configuration was provided.
    ///
    /// This covers invalid header names or values, an invalid content type, and
    /// failures while building the default transport.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Failed to serialize the request body to JSON.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// Failed to gzip-compress the request body.
    #[error("Failed to compress request body: {0}")]
    CompressionFailed(#[from] std::io::Error),

    /// A network-level error reported by the transport.
    ///
    /// The underlying `reqwest::Error` is passed through untouched.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The deadline of the call context expired.
    #[error("Request timed out")]
    Timeout,

    /// The cancellation token of the call context fired.
    #[error("Request cancelled")]
    Cancelled,

    /// The response body is not valid JSON for the target type.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// A text response was received but the target cannot hold a string.
    #[error("unsupported target type {type_name} for text response (status {status})")]
    UnsupportedTarget {
        /// Name of the offending target type
        type_name: &'static str,
        /// The HTTP status code
        status: StatusCode,
    },
}

impl Error {
    /// Returns the category this error belongs to.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluentcall::{Error, ErrorKind};
    ///
    /// assert_eq!(Error::EmptyMethod.kind(), ErrorKind::Validation);
    /// assert_eq!(Error::Timeout.kind(), ErrorKind::Transport);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyHost
            | Error::EmptyMethod
            | Error::MethodNotAllowed(_)
            | Error::InvalidUrl(_) => ErrorKind::Validation,
            Error::ConfigurationError(_) => ErrorKind::Configuration,
            Error::SerializationFailed(_) | Error::CompressionFailed(_) => ErrorKind::Encoding,
            Error::Network(_) | Error::Timeout | Error::Cancelled => ErrorKind::Transport,
            Error::DeserializationFailed { .. } | Error::UnsupportedTarget { .. } => {
                ErrorKind::Decode
            }
        }
    }

    /// Returns `true` if the response was received but could not be decoded.
    pub fn is_decode_error(&self) -> bool {
        self.kind() == ErrorKind::Decode
    }

    /// Returns the HTTP status code if this error has one.
    ///
    /// Only decode errors carry a status; every other error happens before a
    /// response exists.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::UnsupportedTarget { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for HTTP calls.
///
/// This is a convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
