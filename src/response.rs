//! Result envelope of a decoding execution.
//!
//! When [`HttpCall::execute_and_decode`](crate::HttpCall::execute_and_decode)
//! succeeds, the body has already been written into the caller's target and
//! closed, so the only thing left to report is the status code.

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// The status of a completed, decoded call.
///
/// # Examples
///
/// ```
/// use fluentcall::CallResponse;
/// use http::StatusCode;
///
/// let response = CallResponse::new(StatusCode::CREATED);
/// assert_eq!(response.status_code, 201);
/// assert!(response.is_success());
/// assert_eq!(
///     serde_json::to_string(&response).unwrap(),
///     r#"{"status_code":201}"#
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResponse {
    /// The HTTP status code of the response.
    pub status_code: u16,
}

impl CallResponse {
    /// Creates a new `CallResponse`.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status_code: status.as_u16(),
        }
    }

    /// Returns the status as a typed `StatusCode`.
    ///
    /// Returns `None` if `status_code` was set to a value outside 100..=999.
    pub fn status(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status_code).ok()
    }

    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

impl From<StatusCode> for CallResponse {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}
