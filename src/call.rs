//! The fluent call builder and executor.
//!
//! An [`HttpCall`] accumulates everything needed for one outgoing request:
//! host, path, query parameters, method, headers and body. Setters return
//! `&mut Self` so they can be chained, and the same value is executed with
//! [`HttpCall::execute`] or [`HttpCall::execute_and_decode`].
//!
//! Query parameters and the body are per-call: execution takes them out of the
//! builder, so a reused builder never resends a previous payload. Everything
//! else (host, path, method, headers, flags) stays configured.

use crate::body::{apply_default_headers, encode_body, Body};
use crate::decoder::select_decoder;
use crate::query::{encode_query, QueryEncoding, QueryParams};
use crate::transport::{default_client, Transport};
use crate::{CallContext, CallResponse, Error, Result};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// The methods a call may use.
pub const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
];

/// Checks `method` against [`ALLOWED_METHODS`].
///
/// Matching is exact, so `get` is rejected.
///
/// # Errors
///
/// Returns [`Error::EmptyMethod`] for an empty string and
/// [`Error::MethodNotAllowed`] for anything else outside the allow-list.
///
/// # Examples
///
/// ```
/// use fluentcall::{validate_method, Error};
/// use http::Method;
///
/// assert_eq!(validate_method("PATCH").unwrap(), Method::PATCH);
/// assert!(matches!(validate_method(""), Err(Error::EmptyMethod)));
/// assert!(matches!(validate_method("TRACE"), Err(Error::MethodNotAllowed(_))));
/// ```
pub fn validate_method(method: &str) -> Result<Method> {
    if method.is_empty() {
        return Err(Error::EmptyMethod);
    }
    ALLOWED_METHODS
        .iter()
        .find(|allowed| allowed.as_str() == method)
        .cloned()
        .ok_or_else(|| Error::MethodNotAllowed(method.to_string()))
}

/// A configurable, reusable HTTP call.
///
/// A single `HttpCall` is meant for one execution at a time; use separate
/// instances for concurrent calls. The transport itself may be shared.
///
/// # Examples
///
/// ```no_run
/// use fluentcall::{CallContext, HttpCall};
/// use serde::{Deserialize, Serialize};
/// use std::time::Duration;
///
/// #[derive(Serialize)]
/// struct CreateUser {
///     name: String,
/// }
///
/// #[derive(Deserialize, Default)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), fluentcall::Error> {
/// let mut call = HttpCall::new(reqwest::Client::new(), "https://api.example.com");
/// call.method("POST")
///     .path("/users")
///     .param("notify", "true")
///     .gzip(true)
///     .header("x-request-id", "abc123")?
///     .json(&CreateUser { name: "Alice".to_string() })?;
///
/// let ctx = CallContext::background().with_timeout(Duration::from_secs(10));
/// let mut user = User::default();
/// let response = call.execute_and_decode(&ctx, &mut user).await?;
/// println!("{} created user {} ({})", response.status_code, user.id, user.name);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpCall<T = reqwest::Client> {
    transport: T,
    host: String,
    path: String,
    params: QueryParams,
    query_encoding: QueryEncoding,
    method: String,
    headers: HeaderMap,
    body: Option<Body>,
    gzip: bool,
    content_type: Option<String>,
}

impl HttpCall<reqwest::Client> {
    /// Creates a call backed by a freshly built `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if the client cannot be built.
    ///
    /// # Panics
    ///
    /// Panics if `host` is empty.
    pub fn with_default_client(host: impl Into<String>) -> Result<Self> {
        Ok(Self::new(default_client()?, host))
    }
}

impl<T: Transport> HttpCall<T> {
    /// Creates a call that sends through `transport` to `host`.
    ///
    /// `host` includes the scheme, e.g. `https://api.example.com`. The path and
    /// query are appended to it verbatim.
    ///
    /// # Panics
    ///
    /// Panics if `host` is empty.
    pub fn new(transport: T, host: impl Into<String>) -> Self {
        let host = host.into();
        assert!(!host.is_empty(), "empty host");
        Self {
            transport,
            host,
            path: String::new(),
            params: QueryParams::new(),
            query_encoding: QueryEncoding::default(),
            method: String::new(),
            headers: HeaderMap::new(),
            body: None,
            gzip: false,
            content_type: None,
        }
    }

    /// Sets the host.
    pub fn host(&mut self, host: impl Into<String>) -> &mut Self {
        self.host = host.into();
        self
    }

    /// Sets the path appended to the host.
    pub fn path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = path.into();
        self
    }

    /// Replaces the query parameters for the next execution.
    pub fn params(&mut self, params: QueryParams) -> &mut Self {
        self.params = params;
        self
    }

    /// Adds one value to a query parameter for the next execution.
    pub fn param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Sets how query parameters are encoded.
    pub fn query_encoding(&mut self, encoding: QueryEncoding) -> &mut Self {
        self.query_encoding = encoding;
        self
    }

    /// Selects [`QueryEncoding::Escaped`] when `true`, [`QueryEncoding::Raw`] otherwise.
    pub fn escape_query(&mut self, escape: bool) -> &mut Self {
        self.query_encoding(if escape {
            QueryEncoding::Escaped
        } else {
            QueryEncoding::Raw
        })
    }

    /// Sets the HTTP method. It is validated when the call executes.
    pub fn method(&mut self, method: impl Into<String>) -> &mut Self {
        self.method = method.into();
        self
    }

    /// Replaces the caller-supplied headers.
    pub fn headers(&mut self, headers: HeaderMap) -> &mut Self {
        self.headers = headers;
        self
    }

    /// Adds a header value. Existing values for the same name are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<&mut Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Sets the body for the next execution.
    pub fn body(&mut self, body: impl Into<Body>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a structured body for the next execution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] if `value` cannot be represented as JSON.
    pub fn json<B: Serialize + ?Sized>(&mut self, value: &B) -> Result<&mut Self> {
        self.body = Some(Body::json(value)?);
        Ok(self)
    }

    /// Enables or disables gzip compression of the body.
    pub fn gzip(&mut self, gzip: bool) -> &mut Self {
        self.gzip = gzip;
        self
    }

    /// Overrides the default `Content-Type`.
    ///
    /// A structured body still forces `application/json`.
    pub fn content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The full URL the next execution would target, as assembled.
    ///
    /// The string is not normalized. When it is parsed for sending, characters
    /// that cannot appear literally in a URL (quotes, angle brackets, non-ASCII)
    /// are still percent-encoded, so with [`QueryEncoding::Raw`] the request line
    /// can differ from this string.
    pub fn url(&self) -> String {
        self.url_with(&self.params)
    }

    /// Query parameters pending for the next execution.
    pub fn query_params(&self) -> &QueryParams {
        &self.params
    }

    /// Body pending for the next execution.
    pub fn pending_body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// The configured method, as given.
    pub fn method_name(&self) -> &str {
        &self.method
    }

    /// The transport this call sends through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends the request and returns the raw response.
    ///
    /// The response body is not read; the caller owns it. Query parameters and
    /// the body are cleared whatever the outcome.
    ///
    /// # Errors
    ///
    /// Validation and encoding errors are returned before anything is sent.
    /// Transport errors are returned unchanged, and [`Error::Timeout`] or
    /// [`Error::Cancelled`] when `ctx` fires first.
    pub async fn execute(&mut self, ctx: &CallContext) -> Result<reqwest::Response> {
        let params = std::mem::take(&mut self.params);
        let body = self.body.take();

        let request = self.build_request(ctx, &params, body.as_ref())?;

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            gzip = self.gzip,
            "Executing HTTP request"
        );

        let response = ctx.run(self.transport.execute(request)).await?;

        tracing::debug!(status = response.status().as_u16(), "Received HTTP response");

        Ok(response)
    }

    /// Sends the request, reads the whole body and decodes it into `target`.
    ///
    /// The decoder is chosen from the response's `Content-Type`: JSON is
    /// deserialized, `text/plain` and `text/html` are copied as a string. Other
    /// content types leave `target` untouched. The status is returned whatever
    /// it is; a 4xx or 5xx response is not an error by itself.
    ///
    /// # Errors
    ///
    /// Everything [`HttpCall::execute`] returns, plus decode errors
    /// ([`Error::DeserializationFailed`], [`Error::UnsupportedTarget`]).
    pub async fn execute_and_decode<R>(
        &mut self,
        ctx: &CallContext,
        target: &mut R,
    ) -> Result<CallResponse>
    where
        R: DeserializeOwned,
    {
        let response = self.execute(ctx).await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = ctx.run(async { Ok(response.bytes().await?) }).await?;

        match select_decoder(&content_type) {
            Some(decoder) => decoder.decode(&body, status, target)?,
            None => tracing::debug!(
                content_type = %content_type,
                status = status.as_u16(),
                "No decoder for response content type"
            ),
        }

        Ok(CallResponse::new(status))
    }

    fn url_with(&self, params: &QueryParams) -> String {
        let query = encode_query(params, self.query_encoding);
        if query.is_empty() {
            return format!("{}{}", self.host, self.path);
        }
        match self.query_encoding {
            QueryEncoding::Escaped => format!("{}{}?{}", self.host, self.path, query),
            // raw mode turns every space after the host into `+`, path included
            QueryEncoding::Raw => {
                format!("{}{}?{}", self.host, self.path.replace(' ', "+"), query)
            }
        }
    }

    /// Validates the configuration and builds the outgoing request.
    fn build_request(
        &self,
        ctx: &CallContext,
        params: &QueryParams,
        body: Option<&Body>,
    ) -> Result<reqwest::Request> {
        if self.host.is_empty() {
            return Err(Error::EmptyHost);
        }
        let method = validate_method(&self.method)?;
        let url = Url::parse(&self.url_with(params))?;
        ctx.check()?;

        let mut request = reqwest::Request::new(method, url);
        *request.timeout_mut() = ctx.remaining();

        let headers = request.headers_mut();
        apply_default_headers(headers);
        if let Some(content_type) = &self.content_type {
            let value = HeaderValue::try_from(content_type.as_str())
                .map_err(|e| Error::ConfigurationError(format!("Invalid content type: {}", e)))?;
            headers.insert(CONTENT_TYPE, value);
        }

        let encoded = encode_body(body, self.gzip)?;
        encoded.apply_headers(headers);

        for (name, value) in &self.headers {
            headers.append(name, value.clone());
        }

        tracing::trace!(
            content_length = encoded.content_length(),
            gzip = encoded.is_gzipped(),
            "Encoded request body"
        );

        if body.is_some() {
            *request.body_mut() = Some(encoded.into_payload().into());
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use http::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_LENGTH};
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;
    use std::io::Read;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[derive(Debug)]
    struct Captured {
        method: Method,
        url: String,
        headers: HeaderMap,
        body: Option<Vec<u8>>,
    }

    /// Answers every request with a canned response and records what it saw.
    #[derive(Debug)]
    struct MockTransport {
        status: u16,
        content_type: Option<&'static str>,
        body: &'static str,
        requests: Mutex<Vec<Captured>>,
    }

    impl MockTransport {
        fn new(status: u16, content_type: Option<&'static str>, body: &'static str) -> Self {
            Self {
                status,
                content_type,
                body,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn ok() -> Self {
            Self::new(200, Some("application/json"), r#"{"key":"value"}"#)
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl Transport for MockTransport {
        async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response> {
            self.requests.lock().unwrap().push(Captured {
                method: request.method().clone(),
                url: request.url().to_string(),
                headers: request.headers().clone(),
                body: request.body().and_then(|b| b.as_bytes()).map(<[u8]>::to_vec),
            });

            let mut builder = http::Response::builder().status(self.status);
            if let Some(content_type) = self.content_type {
                builder = builder.header(CONTENT_TYPE, content_type);
            }
            Ok(reqwest::Response::from(builder.body(self.body).unwrap()))
        }
    }

    const HOST: &str = "http://example.com";

    #[test]
    fn test_new_call_defaults() {
        let call = HttpCall::new(MockTransport::ok(), HOST);
        assert_eq!(call.host, HOST);
        assert!(call.path.is_empty());
        assert!(call.params.is_empty());
        assert_eq!(call.query_encoding, QueryEncoding::Escaped);
        assert!(call.method.is_empty());
        assert!(call.headers.is_empty());
        assert!(call.body.is_none());
        assert!(!call.gzip);
        assert!(call.content_type.is_none());
    }

    #[test]
    #[should_panic(expected = "empty host")]
    fn test_new_call_panics_on_empty_host() {
        HttpCall::new(MockTransport::ok(), "");
    }

    #[test]
    fn test_setters_chain() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.path("/test-path")
            .param("key", "value")
            .escape_query(false)
            .method("POST")
            .body(json!({"key": "value"}))
            .gzip(true)
            .content_type("text/plain")
            .header("x-header", "value")
            .unwrap();

        assert_eq!(call.path, "/test-path");
        assert_eq!(call.query_params()["key"], vec!["value".to_string()]);
        assert_eq!(call.query_encoding, QueryEncoding::Raw);
        assert_eq!(call.method_name(), "POST");
        assert_eq!(call.pending_body(), Some(&Body::Json(json!({"key": "value"}))));
        assert!(call.gzip);
        assert_eq!(call.content_type.as_deref(), Some("text/plain"));
        assert_eq!(call.headers.get("x-header").unwrap(), "value");
    }

    #[test]
    fn test_invalid_header_is_configuration_error() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        let err = call.header("bad header", "value").unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
        let err = call.header("x-ok", "line\nbreak").unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }

    #[test]
    fn test_validate_method() {
        for method in ["GET", "POST", "PUT", "DELETE", "PATCH"] {
            assert_eq!(validate_method(method).unwrap().as_str(), method);
        }
        assert!(matches!(validate_method(""), Err(Error::EmptyMethod)));
        for method in ["INVALID", "HEAD", "OPTIONS", "get"] {
            match validate_method(method) {
                Err(Error::MethodNotAllowed(m)) => assert_eq!(m, method),
                other => panic!("Expected MethodNotAllowed, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_url_assembly() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.path("/test-path");
        assert_eq!(call.url(), "http://example.com/test-path");

        call.param("key", "value");
        assert_eq!(call.url(), "http://example.com/test-path?key=value");

        let mut params = QueryParams::new();
        params.insert("key".to_string(), vec!["value with spaces".to_string()]);
        call.params(params).escape_query(false);
        assert_eq!(
            call.url(),
            "http://example.com/test-path?key=value+with+spaces"
        );
    }

    #[test]
    fn test_url_contains_every_param() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.path("/test")
            .param("key2", "value2")
            .param("key1", "value1");

        let url = call.url();
        assert!(url.starts_with("http://example.com/test?"));
        assert!(url.contains("key1=value1"));
        assert!(url.contains("key2=value2"));
    }

    #[tokio::test]
    async fn test_raw_mode_replaces_spaces_in_path() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.method("GET").path("/a b");
        assert_eq!(call.url(), "http://example.com/a b");

        call.param("q", "x y");
        assert_eq!(call.url(), "http://example.com/a b?q=x+y");

        call.escape_query(false);
        assert_eq!(call.url(), "http://example.com/a+b?q=x+y");

        call.execute(&CallContext::background()).await.unwrap();
        call.escape_query(true).param("q", "x y");
        call.execute(&CallContext::background()).await.unwrap();

        let requests = call.transport().requests.lock().unwrap();
        assert_eq!(requests[0].url, "http://example.com/a+b?q=x+y");
        assert_eq!(requests[1].url, "http://example.com/a%20b?q=x+y");
    }

    #[tokio::test]
    async fn test_raw_query_is_normalized_when_sent() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.method("GET")
            .path("/search")
            .escape_query(false)
            .param("q", "it's <x> é");
        assert_eq!(call.url(), "http://example.com/search?q=it's+<x>+é");

        call.execute(&CallContext::background()).await.unwrap();

        let requests = call.transport().requests.lock().unwrap();
        assert_eq!(
            requests[0].url,
            "http://example.com/search?q=it%27s+%3Cx%3E+%C3%A9"
        );
    }

    #[tokio::test]
    async fn test_execute_sends_request() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.method("GET").path("/items").param("page", "2");

        let response = call.execute(&CallContext::background()).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let requests = call.transport().requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].url, "http://example.com/items?page=2");
        assert!(requests[0].body.is_none());
        assert_eq!(requests[0].headers.get(CONTENT_LENGTH).unwrap(), "0");
    }

    #[tokio::test]
    async fn test_execute_rejects_empty_host() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.host("").method("GET");

        let err = call.execute(&CallContext::background()).await.unwrap_err();
        assert!(matches!(err, Error::EmptyHost));
        assert_eq!(call.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_execute_rejects_invalid_method() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);

        let err = call.execute(&CallContext::background()).await.unwrap_err();
        assert!(matches!(err, Error::EmptyMethod));

        call.method("INVALID");
        let err = call.execute(&CallContext::background()).await.unwrap_err();
        assert!(matches!(err, Error::MethodNotAllowed(_)));
        assert_eq!(call.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let mut call = HttpCall::new(MockTransport::ok(), "example.com");
        call.method("GET");

        let err = call.execute(&CallContext::background()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_per_call_fields_are_cleared() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.method("POST")
            .param("key", "value")
            .body("payload");

        call.execute(&CallContext::background()).await.unwrap();
        assert!(call.query_params().is_empty());
        assert!(call.pending_body().is_none());

        call.execute(&CallContext::background()).await.unwrap();
        let requests = call.transport().requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, "http://example.com/?key=value");
        assert_eq!(requests[0].body.as_deref(), Some(&b"payload"[..]));
        assert_eq!(requests[1].url, "http://example.com/");
        assert!(requests[1].body.is_none());
    }

    #[tokio::test]
    async fn test_per_call_fields_are_cleared_on_failure() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.method("INVALID")
            .param("key", "value")
            .body(json!({"key": "value"}));

        assert!(call.execute(&CallContext::background()).await.is_err());
        assert!(call.query_params().is_empty());
        assert!(call.pending_body().is_none());
    }

    #[tokio::test]
    async fn test_default_and_caller_headers() {
        let mut headers = HeaderMap::new();
        headers.append(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        headers.append(ACCEPT_ENCODING, HeaderValue::from_static("deflate"));
        headers.append(ACCEPT, HeaderValue::from_static("text/plain"));

        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.method("GET").headers(headers);
        call.execute(&CallContext::background()).await.unwrap();

        let requests = call.transport().requests.lock().unwrap();
        let sent = &requests[0].headers;
        assert_eq!(sent.get(CONTENT_TYPE).unwrap(), "application/json");

        let accept: Vec<_> = sent.get_all(ACCEPT).iter().collect();
        assert_eq!(accept, vec!["application/json", "text/plain"]);

        let encodings: Vec<_> = sent.get_all(ACCEPT_ENCODING).iter().collect();
        assert_eq!(encodings, vec!["gzip", "deflate"]);
    }

    #[tokio::test]
    async fn test_text_body_with_explicit_content_type() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.method("PUT")
            .content_type("text/plain")
            .body("hello");
        call.execute(&CallContext::background()).await.unwrap();

        let requests = call.transport().requests.lock().unwrap();
        assert_eq!(requests[0].headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(requests[0].headers.get(CONTENT_LENGTH).unwrap(), "5");
        assert_eq!(requests[0].body.as_deref(), Some(&b"hello"[..]));
    }

    #[tokio::test]
    async fn test_structured_body_forces_json_content_type() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.method("POST")
            .content_type("text/plain")
            .json(&HashMap::from([("key", "value")]))
            .unwrap();
        call.execute(&CallContext::background()).await.unwrap();

        let requests = call.transport().requests.lock().unwrap();
        assert_eq!(
            requests[0].headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let sent: serde_json::Value =
            serde_json::from_slice(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, json!({"key": "value"}));
    }

    #[tokio::test]
    async fn test_gzip_body() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.method("POST").gzip(true).body(json!({"key": "value"}));
        call.execute(&CallContext::background()).await.unwrap();

        let requests = call.transport().requests.lock().unwrap();
        let sent = &requests[0];
        assert_eq!(sent.headers.get(CONTENT_ENCODING).unwrap(), "gzip");
        assert_eq!(sent.headers.get("vary").unwrap(), "Accept-Encoding");

        let compressed = sent.body.as_deref().unwrap();
        let mut decompressed = String::new();
        GzDecoder::new(compressed)
            .read_to_string(&mut decompressed)
            .unwrap();
        assert_eq!(decompressed, r#"{"key":"value"}"#);
        assert_ne!(compressed.len(), decompressed.len());
    }

    #[tokio::test]
    async fn test_invalid_content_type() {
        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.method("GET").content_type("bad\nvalue");

        let err = call.execute(&CallContext::background()).await.unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
        assert_eq!(call.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_context_sends_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = CallContext::background().with_cancellation(token);

        let mut call = HttpCall::new(MockTransport::ok(), HOST);
        call.method("GET");

        let err = call.execute(&ctx).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert_eq!(call.transport().request_count(), 0);
    }

    #[derive(Debug, Default, Deserialize)]
    struct Person {
        name: String,
    }

    #[tokio::test]
    async fn test_execute_and_decode_json() {
        let transport = MockTransport::new(201, Some("application/json"), r#"{"name":"Pablo"}"#);
        let mut call = HttpCall::new(transport, HOST);
        call.method("POST");

        let mut person = Person::default();
        let response = call
            .execute_and_decode(&CallContext::background(), &mut person)
            .await
            .unwrap();

        assert_eq!(response.status_code, 201);
        assert_eq!(person.name, "Pablo");
    }

    #[tokio::test]
    async fn test_execute_and_decode_text_and_html() {
        for (content_type, body) in [
            ("text/plain", "Hello, world!"),
            ("text/html", "<html><body>Hello, world!</body></html>"),
        ] {
            let mut call = HttpCall::new(MockTransport::new(200, Some(content_type), body), HOST);
            call.method("GET");

            let mut text = String::new();
            let response = call
                .execute_and_decode(&CallContext::background(), &mut text)
                .await
                .unwrap();

            assert_eq!(response.status_code, 200);
            assert_eq!(text, body);
        }
    }

    #[tokio::test]
    async fn test_execute_and_decode_unknown_content_type_is_noop() {
        let transport = MockTransport::new(200, Some("application/xml"), "<a/>");
        let mut call = HttpCall::new(transport, HOST);
        call.method("GET");

        let mut target = Person {
            name: "unchanged".to_string(),
        };
        let response = call
            .execute_and_decode(&CallContext::background(), &mut target)
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(target.name, "unchanged");
    }

    #[tokio::test]
    async fn test_execute_and_decode_errors() {
        let transport = MockTransport::new(200, Some("application/json"), "not json");
        let mut call = HttpCall::new(transport, HOST);
        call.method("GET");

        let mut person = Person::default();
        let err = call
            .execute_and_decode(&CallContext::background(), &mut person)
            .await
            .unwrap_err();
        assert!(err.is_decode_error());
        assert_eq!(err.raw_response(), Some("not json"));

        let transport = MockTransport::new(200, Some("text/plain"), "text");
        let mut call = HttpCall::new(transport, HOST);
        call.method("GET");

        let mut number: u32 = 0;
        let err = call
            .execute_and_decode(&CallContext::background(), &mut number)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedTarget { type_name: "u32", .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_propagated_to_request() {
        let ctx = CallContext::background().with_timeout(Duration::from_secs(30));
        let call = {
            let mut call = HttpCall::new(MockTransport::ok(), HOST);
            call.method("GET");
            call
        };

        let request = call
            .build_request(&ctx, &QueryParams::new(), None)
            .unwrap();
        let timeout = request.timeout().copied().unwrap();
        assert!(timeout <= Duration::from_secs(30));
        assert!(timeout > Duration::from_secs(25));
    }
}
