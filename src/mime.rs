//! MIME types understood by the body encoder and the response decoder.

/// `application/json`
pub const APPLICATION_JSON: &str = "application/json";

/// `text/plain`
pub const TEXT_PLAIN: &str = "text/plain";

/// `text/html`
pub const TEXT_HTML: &str = "text/html";

/// `gzip`, the only content encoding produced for request bodies.
pub const GZIP: &str = "gzip";
