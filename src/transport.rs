//! The network seam.
//!
//! [`HttpCall`](crate::HttpCall) never touches sockets itself. It builds a
//! `reqwest::Request` and hands it to a [`Transport`], which owns connection
//! pooling, TLS, redirects and everything else on the wire.

use crate::{Error, Result};
use std::future::Future;
use std::sync::Arc;

/// Executes a fully formed request.
///
/// Implementations are expected to be safe to share between independent calls.
/// `reqwest::Client` is the default implementation; tests can substitute an
/// in-memory transport.
///
/// # Examples
///
/// ```
/// use fluentcall::{Result, Transport};
///
/// struct Teapot;
///
/// impl Transport for Teapot {
///     async fn execute(&self, _request: reqwest::Request) -> Result<reqwest::Response> {
///         let response = http::Response::builder()
///             .status(418)
///             .body("short and stout")
///             .unwrap();
///         Ok(reqwest::Response::from(response))
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response, or the transport's error.
    fn execute(
        &self,
        request: reqwest::Request,
    ) -> impl Future<Output = Result<reqwest::Response>> + Send;
}

impl Transport for reqwest::Client {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        Ok(reqwest::Client::execute(self, request).await?)
    }
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(
        &self,
        request: reqwest::Request,
    ) -> impl Future<Output = Result<reqwest::Response>> + Send {
        (**self).execute(request)
    }
}

impl<T: Transport> Transport for &T {
    fn execute(
        &self,
        request: reqwest::Request,
    ) -> impl Future<Output = Result<reqwest::Response>> + Send {
        (**self).execute(request)
    }
}

/// Builds a `reqwest::Client` with default settings.
///
/// # Errors
///
/// Returns [`Error::ConfigurationError`] if the client cannot be built, for
/// example when the TLS backend fails to initialize.
pub fn default_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| Error::ConfigurationError(format!("Failed to build HTTP client: {}", e)))
}
