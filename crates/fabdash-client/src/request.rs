//! Pending-request description
//!
//! A `RequestOptions` exists for the duration of one logical call,
//! including the at-most-one retry after a token refresh — the retry
//! re-dispatches the same options with only the Authorization header
//! changing.

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::str::FromStr;
use tracing::warn;

/// Request body, serialized per variant.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Serialized to JSON text
    Json(serde_json::Value),
    /// Passed through unchanged
    Text(String),
    /// Passed through unchanged (uploads, binary round-trips)
    Bytes(Vec<u8>),
}

/// Method, query, headers, and body of one logical call.
///
/// Query pairs keep caller order. Header pairs are applied on top of the
/// defaults: a matching name overrides, an empty value removes (used to
/// drop the JSON content type for binary/PDF fetches).
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub(crate) method: Method,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<Payload>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    pub fn put() -> Self {
        Self {
            method: Method::PUT,
            ..Self::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    /// Append a query pair; caller order is preserved on the wire.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header. Overrides a default of the same name; an empty value
    /// removes the header entirely.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(Payload::Json(body));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Payload::Text(body.into()));
        self
    }

    pub fn bytes(mut self, body: Vec<u8>) -> Self {
        self.body = Some(Payload::Bytes(body));
        self
    }
}

/// Final header set: defaults, then caller pairs (override or remove).
///
/// Invalid header names/values are skipped with a warning rather than
/// failing the call.
pub(crate) fn build_headers(options: &RequestOptions) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in &options.headers {
        let name = match HeaderName::from_str(name) {
            Ok(n) => n,
            Err(e) => {
                warn!(header = %name, error = %e, "skipping invalid header name");
                continue;
            }
        };
        if value.is_empty() {
            headers.remove(&name);
            continue;
        }
        match HeaderValue::from_str(value) {
            Ok(v) => {
                headers.insert(name, v);
            }
            Err(e) => {
                warn!(header = %name, error = %e, "skipping invalid header value");
            }
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_content_type_is_json() {
        let headers = build_headers(&RequestOptions::get());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn caller_header_overrides_default() {
        let options = RequestOptions::get().header("Content-Type", "application/pdf");
        let headers = build_headers(&options);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/pdf");
    }

    #[test]
    fn empty_value_removes_header() {
        let options = RequestOptions::get().header("content-type", "");
        let headers = build_headers(&options);
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn header_names_are_case_insensitive() {
        let options = RequestOptions::get()
            .header("X-Request-Source", "dashboard")
            .header("x-request-source", "report-export");
        let headers = build_headers(&options);
        assert_eq!(headers.get("x-request-source").unwrap(), "report-export");
        assert_eq!(headers.len(), 2, "content-type plus one custom header");
    }

    #[test]
    fn invalid_header_name_is_skipped() {
        let options = RequestOptions::get()
            .header("bad header name", "value")
            .header("x-valid", "works");
        let headers = build_headers(&options);
        assert!(headers.get("x-valid").is_some());
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn query_preserves_caller_order() {
        let options = RequestOptions::get()
            .query("status", "open")
            .query("page", "2")
            .query("status", "late");
        assert_eq!(
            options.query,
            vec![
                ("status".to_owned(), "open".to_owned()),
                ("page".to_owned(), "2".to_owned()),
                ("status".to_owned(), "late".to_owned()),
            ]
        );
    }
}
