//! Request body encoding.
//!
//! A [`Body`] is either raw text, sent as-is, or a structured value, sent as
//! JSON. Either can be gzip-compressed. [`encode_body`] turns a body into an
//! [`EncodedBody`], which knows the payload bytes and the header changes that go
//! with them.

use crate::{mime, Error, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use http::header::{ACCEPT, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, VARY};
use http::{HeaderMap, HeaderValue};
use serde::Serialize;
use std::io::Write;

/// The payload of a call.
///
/// Only two shapes are distinguished: text is passed through untouched, and
/// everything else is treated as a JSON-serializable value.
///
/// # Examples
///
/// ```
/// use fluentcall::Body;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct CreateUser { name: String }
///
/// let text = Body::from("plain text");
/// assert!(!text.is_structured());
///
/// let json = Body::json(&CreateUser { name: "Alice".to_string() }).unwrap();
/// assert!(json.is_structured());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Raw text, sent byte for byte. The content type is left to the caller.
    Text(String),

    /// A structured value, serialized as JSON with `Content-Type: application/json`.
    Json(serde_json::Value),
}

impl Body {
    /// Converts any serializable value into a [`Body::Json`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] if the value cannot be represented
    /// as JSON, for example a map with non-string keys.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Body::Json)
            .map_err(|e| Error::SerializationFailed(e.to_string()))
    }

    /// Returns `true` for [`Body::Json`].
    pub fn is_structured(&self) -> bool {
        matches!(self, Body::Json(_))
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Body::Text(text) => Ok(text.as_bytes().to_vec()),
            Body::Json(value) => {
                serde_json::to_vec(value).map_err(|e| Error::SerializationFailed(e.to_string()))
            }
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Body::Json(value)
    }
}

/// A body ready to be attached to a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedBody {
    payload: Vec<u8>,
    gzipped: bool,
    structured: bool,
}

impl EncodedBody {
    /// The bytes to send.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consumes the encoded body, returning the bytes to send.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Length of the payload in bytes. Zero when there is no body.
    pub fn content_length(&self) -> u64 {
        self.payload.len() as u64
    }

    /// Returns `true` if the payload is gzip-compressed.
    pub fn is_gzipped(&self) -> bool {
        self.gzipped
    }

    /// Applies the body's header changes.
    ///
    /// `Content-Length` is always set. A gzipped payload appends
    /// `Content-Encoding: gzip` and `Vary: Accept-Encoding`. A structured payload
    /// overrides `Content-Type` with `application/json`; a text payload leaves
    /// whatever content type is already present.
    pub fn apply_headers(&self, headers: &mut HeaderMap) {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(self.content_length()));
        if self.gzipped {
            headers.append(CONTENT_ENCODING, HeaderValue::from_static(mime::GZIP));
            headers.append(VARY, HeaderValue::from_static("Accept-Encoding"));
        }
        if self.structured {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(mime::APPLICATION_JSON));
        }
    }
}

/// Encodes an optional body, gzip-compressing it when `gzip` is set.
///
/// An absent body encodes to an empty payload with a content length of zero.
///
/// # Errors
///
/// Returns [`Error::SerializationFailed`] if JSON serialization fails and
/// [`Error::CompressionFailed`] if the gzip stream cannot be written.
///
/// # Examples
///
/// ```
/// use fluentcall::{encode_body, Body};
/// use serde_json::json;
///
/// let encoded = encode_body(Some(&Body::from(json!({"key": "value"}))), false).unwrap();
/// assert_eq!(encoded.payload(), br#"{"key":"value"}"#);
///
/// let empty = encode_body(None, true).unwrap();
/// assert_eq!(empty.content_length(), 0);
/// ```
pub fn encode_body(body: Option<&Body>, gzip: bool) -> Result<EncodedBody> {
    let Some(body) = body else {
        return Ok(EncodedBody::default());
    };

    let raw = body.to_bytes()?;
    let payload = if gzip { gzip_compress(&raw)? } else { raw };

    Ok(EncodedBody {
        payload,
        gzipped: gzip,
        structured: body.is_structured(),
    })
}

/// Sets the headers every new request starts with.
///
/// `Accept: application/json` is appended and `Content-Type: application/json`
/// is set. Anything applied afterwards may override them.
pub fn apply_default_headers(headers: &mut HeaderMap) {
    headers.append(ACCEPT, HeaderValue::from_static(mime::APPLICATION_JSON));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(mime::APPLICATION_JSON));
}

fn gzip_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
