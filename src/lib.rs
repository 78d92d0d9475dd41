//! # Fluentcall - a fluent HTTP call builder
//!
//! Fluentcall configures a single outgoing HTTP request step by step (host,
//! path, query parameters, headers, method, body, compression) and executes it
//! through a pluggable transport, `reqwest::Client` by default. Responses can be
//! returned raw or decoded into a caller-provided target based on their
//! `Content-Type`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fluentcall::{CallContext, HttpCall};
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize)]
//! struct CreateUser {
//!     name: String,
//!     email: String,
//! }
//!
//! #[derive(Deserialize, Default)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fluentcall::Error> {
//!     let mut call = HttpCall::with_default_client("https://api.example.com")?;
//!     let ctx = CallContext::background().with_timeout(Duration::from_secs(30));
//!
//!     // POST a gzip-compressed JSON body and decode the JSON answer
//!     let mut created = User::default();
//!     let response = call
//!         .method("POST")
//!         .path("/users")
//!         .gzip(true)
//!         .json(&CreateUser {
//!             name: "Alice".to_string(),
//!             email: "alice@example.com".to_string(),
//!         })?
//!         .execute_and_decode(&ctx, &mut created)
//!         .await?;
//!     println!("{} -> created user {}", response.status_code, created.id);
//!
//!     // Reuse the same call for a raw GET; the previous body is gone
//!     let raw = call
//!         .method("GET")
//!         .path("/users")
//!         .param("name", "Alice")
//!         .execute(&ctx)
//!         .await?;
//!     println!("{}", raw.text().await?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Request encoding
//!
//! - Every request starts with `Accept: application/json` and
//!   `Content-Type: application/json`. An explicit [`HttpCall::content_type`]
//!   replaces the latter, caller headers are appended last.
//! - A [`Body::Text`] body is sent verbatim; a [`Body::Json`] body is sent as
//!   JSON and forces `Content-Type: application/json`.
//! - With [`HttpCall::gzip`], the payload is gzip-compressed and
//!   `Content-Encoding: gzip` and `Vary: Accept-Encoding` are added.
//! - Query parameters are percent-encoded by default. [`QueryEncoding::Raw`]
//!   writes them verbatim, turning spaces into `+`.
//!
//! ## Response decoding
//!
//! [`HttpCall::execute_and_decode`] reads the whole body and picks a
//! [`Decoder`] from the `Content-Type`: `application/json` is deserialized,
//! `text/plain` and `text/html` are copied into string targets, and anything
//! else leaves the target untouched.
//!
//! ## Error Handling
//!
//! Errors fall into the categories of [`ErrorKind`], so "the response could not
//! be decoded" is easy to tell apart from "the request failed":
//!
//! ```no_run
//! use fluentcall::{CallContext, ErrorKind, HttpCall};
//!
//! # async fn example() -> Result<(), fluentcall::Error> {
//! let mut call = HttpCall::with_default_client("https://api.example.com")?;
//! let mut body = serde_json::Value::Null;
//! let result = call
//!     .method("GET")
//!     .execute_and_decode(&CallContext::background(), &mut body)
//!     .await;
//! match result {
//!     Ok(response) => println!("{}: {}", response.status_code, body),
//!     Err(e) if e.kind() == ErrorKind::Decode => eprintln!("Unreadable response: {}", e),
//!     Err(e) => eprintln!("Request failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod body;
mod call;
mod context;
pub mod decoder;
mod error;
pub mod mime;
pub mod query;
mod response;
pub mod transport;

pub use body::{apply_default_headers, encode_body, Body, EncodedBody};
pub use call::{validate_method, HttpCall, ALLOWED_METHODS};
pub use context::CallContext;
pub use decoder::{select_decoder, Decoder};
pub use error::{Error, ErrorKind, Result};
pub use query::{encode_query, QueryEncoding, QueryParams};
pub use response::CallResponse;
pub use transport::Transport;
