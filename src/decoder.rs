//! Content-type driven response decoding.
//!
//! [`select_decoder`] looks the response's `Content-Type` up in a small registry
//! of substrings. JSON bodies are deserialized into the target; text and HTML
//! bodies are copied into targets that can hold a string. Any other content type
//! has no decoder and the body is left alone.

use crate::{mime, Error, Result};
use http::StatusCode;
use serde::de::value::StringDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};

/// A strategy for turning a response body into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    /// Deserialize the body as JSON.
    Json,

    /// Copy the body as text. The target must accept a string.
    Text,
}

const DECODERS: &[(&str, Decoder)] = &[
    (mime::APPLICATION_JSON, Decoder::Json),
    (mime::TEXT_PLAIN, Decoder::Text),
    (mime::TEXT_HTML, Decoder::Text),
];

/// Selects the decoder for a `Content-Type` value.
///
/// Matching is by substring, so parameters such as `; charset=utf-8` are
/// ignored. Returns `None` when no decoder handles the type.
///
/// # Examples
///
/// ```
/// use fluentcall::{select_decoder, Decoder};
///
/// assert_eq!(select_decoder("application/json; charset=utf-8"), Some(Decoder::Json));
/// assert_eq!(select_decoder("text/html"), Some(Decoder::Text));
/// assert_eq!(select_decoder("application/xml"), None);
/// ```
pub fn select_decoder(content_type: &str) -> Option<Decoder> {
    DECODERS
        .iter()
        .find(|(needle, _)| content_type.contains(needle))
        .map(|(_, decoder)| *decoder)
}

impl Decoder {
    /// Decodes `body` into `target`.
    ///
    /// `status` is only used to annotate errors.
    ///
    /// # Errors
    ///
    /// [`Decoder::Json`] returns [`Error::DeserializationFailed`] for malformed
    /// JSON or JSON that does not fit the target. [`Decoder::Text`] returns
    /// [`Error::UnsupportedTarget`] when the target cannot hold a string.
    pub fn decode<R>(&self, body: &[u8], status: StatusCode, target: &mut R) -> Result<()>
    where
        R: DeserializeOwned,
    {
        match self {
            Decoder::Json => {
                *target = serde_json::from_slice(body).map_err(|e| {
                    Error::DeserializationFailed {
                        raw_response: String::from_utf8_lossy(body).into_owned(),
                        serde_error: e.to_string(),
                        status,
                    }
                })?;
            }
            Decoder::Text => {
                let text = String::from_utf8_lossy(body).into_owned();
                let deserializer: StringDeserializer<serde::de::value::Error> =
                    text.into_deserializer();
                *target = R::deserialize(deserializer).map_err(|_| Error::UnsupportedTarget {
                    type_name: std::any::type_name::<R>(),
                    status,
                })?;
            }
        }
        Ok(())
    }
}
