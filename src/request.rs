//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::method::Method;

/// An incoming HTTP request with its body fully buffered.
///
/// Path parameters are empty until the router matches the request; stages
/// running before dispatch see only method, path, headers, and body.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) body_error: Option<String>,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: impl Into<String>,
        headers: Vec<(String, String)>,
        body: Bytes,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            body,
            body_error: None,
            params: HashMap::new(),
        }
    }

    /// Builds a request from hyper's parts and the buffered body.
    ///
    /// Header values that are not valid UTF-8 are decoded lossily, so a
    /// malformed `Authorization` value still reaches the auth stage as a
    /// present-but-wrong credential.
    pub(crate) fn from_parts(method: Method, parts: http::request::Parts, body: Bytes) -> Self {
        let headers = parts
            .headers
            .iter()
            .map(|(k, v)| {
                let value = String::from_utf8_lossy(v.as_bytes()).into_owned();
                (k.as_str().to_owned(), value)
            })
            .collect();
        Self::new(method, parts.uri.path(), headers, body)
    }

    /// Marks the body as unreadable. The request still runs the full
    /// pipeline; the router answers it with 400 instead of dispatching.
    pub(crate) fn with_body_error(mut self, reason: String) -> Self {
        self.body = Bytes::new();
        self.body_error = Some(reason);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

#[cfg(test)]
impl Request {
    /// Test-only constructor for driving handlers and stages in-process.
    pub(crate) fn test(method: Method, path: &str) -> Self {
        Self::new(method, path, Vec::new(), Bytes::new())
    }

    pub(crate) fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub(crate) fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Bytes::from(body.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::test(Method::Get, "/users").with_header("Authorization", "Bearer x");
        assert_eq!(req.header("authorization"), Some("Bearer x"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn json_body_deserializes() {
        let req = Request::test(Method::Post, "/users")
            .with_json(serde_json::json!({ "username": "alice" }));
        let v: serde_json::Value = req.json().unwrap();
        assert_eq!(v["username"], "alice");
    }

    #[test]
    fn non_ascii_header_values_are_kept() {
        let (parts, ()) = http::Request::builder()
            .uri("/users?page=2")
            .header("authorization", HeaderValue::from_bytes(b"Bearer t\xc3\xb6k").unwrap())
            .header("x-raw", HeaderValue::from_bytes(b"a\xffb").unwrap())
            .body(())
            .unwrap()
            .into_parts();

        let req = Request::from_parts(Method::Get, parts, Bytes::new());
        assert_eq!(req.path(), "/users");
        assert_eq!(req.header("authorization"), Some("Bearer t\u{f6}k"));
        assert_eq!(req.header("x-raw"), Some("a\u{fffd}b"));
    }
}
