//! Query string encoding.
//!
//! Parameters are kept in a [`QueryParams`] map, which iterates keys in sorted
//! order, so both encodings produce the same string for the same parameters.

use std::collections::BTreeMap;

/// Query parameters: each name maps to one or more values.
///
/// Multi-valued parameters are written as repeated pairs, `key=v1&key=v2`.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// How query parameters are written into the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryEncoding {
    /// Standard `application/x-www-form-urlencoded` percent-encoding.
    #[default]
    Escaped,

    /// Keys and values are written verbatim except that spaces become `+`.
    ///
    /// `&` and `=` inside values are not escaped; the caller must make sure
    /// they do not break the parameter grammar.
    ///
    /// When a call sends raw parameters, spaces in its path become `+` as well.
    /// Characters that are never valid in a URL, such as `'`, `<`, `>`, `"` and
    /// non-ASCII text, are still percent-encoded when the URL is parsed for
    /// sending.
    Raw,
}

/// Encodes `params` into a query string without the leading `?`.
///
/// Returns an empty string when there is nothing to encode, including when
/// every key carries an empty value list.
///
/// # Examples
///
/// ```
/// use fluentcall::{encode_query, QueryEncoding, QueryParams};
///
/// let mut params = QueryParams::new();
/// params.insert("q".to_string(), vec!["rust lang".to_string()]);
/// params.insert("a".to_string(), vec!["1&2".to_string()]);
///
/// assert_eq!(encode_query(&params, QueryEncoding::Escaped), "a=1%262&q=rust+lang");
/// assert_eq!(encode_query(&params, QueryEncoding::Raw), "a=1&2&q=rust+lang");
/// ```
pub fn encode_query(params: &QueryParams, encoding: QueryEncoding) -> String {
    match encoding {
        QueryEncoding::Escaped => encode_escaped(params),
        QueryEncoding::Raw => encode_raw(params).replace(' ', "+"),
    }
}

fn encode_escaped(params: &QueryParams) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, values) in params {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}

fn encode_raw(params: &QueryParams) -> String {
    let mut buf = String::new();
    for (key, values) in params {
        for value in values {
            if !buf.is_empty() {
                buf.push('&');
            }
            buf.push_str(key);
            buf.push('=');
            buf.push_str(value);
        }
    }
    buf
}
