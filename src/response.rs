//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Build a [`Response`] in your handler and return it. Every error body in
//! this service has the same shape, `{"error": "..."}`, so [`Response::error`]
//! is the one place that shape is produced.

use bytes::Bytes;
use http_body_util::Full;
use serde::Serialize;
use serde_json::json;

use crate::status::Status;

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts
///
/// ```rust
/// use usersvc::{Response, Status};
///
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::status(Status::NoContent);
/// Response::error(Status::BadRequest, "Invalid email format");
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use usersvc::{Response, Status};
///
/// Response::builder()
///     .status(Status::Created)
///     .header("location", "/users/42")
///     .json(br#"{"id":42}"#.to_vec());
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: u16,
}

impl Response {
    /// `200 OK`, `application/json`.
    pub fn json(body: Vec<u8>) -> Self {
        Self::builder().json(body)
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self {
            body: Vec::new(),
            headers: Vec::new(),
            status: code.into(),
        }
    }

    /// JSON error body: `{"error": message}`.
    pub fn error(code: Status, message: impl Into<String>) -> Self {
        Self::builder()
            .status(code)
            .json(json!({ "error": message.into() }).to_string().into_bytes())
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder {
            headers: Vec::new(),
            status: Status::Ok.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status
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

    /// Converts into the hyper response written to the wire. A header that
    /// `http` rejects turns the whole response into an empty 500.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder.body(Full::new(Bytes::from(self.body))).unwrap_or_else(|_| {
            let mut res = http::Response::new(Full::new(Bytes::new()));
            *res.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
            res
        })
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok` (200).
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: u16,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code.into();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), "application/json".to_owned())];
        headers.extend(self.headers);
        Response {
            body,
            headers,
            status: self.status,
        }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

/// Return a [`Status`] directly from a handler: `return Status::NoContent`
impl IntoResponse for Status {
    fn into_response(self) -> Response {
        Response::status(self)
    }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

/// `200 OK` with `T` serialized as the JSON body.
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => Response::json(bytes),
            Err(e) => Response::error(Status::InternalServerError, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_has_error_field() {
        let res = Response::error(Status::NotFound, "User not found");
        assert_eq!(res.status_code(), 404);
        assert_eq!(res.header("Content-Type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body, json!({ "error": "User not found" }));
    }

    #[test]
    fn builder_keeps_extra_headers_after_content_type() {
        let res = Response::builder()
            .status(Status::Created)
            .header("location", "/users/7")
            .json(b"{}".to_vec());
        assert_eq!(res.status_code(), 201);
        assert_eq!(res.header("location"), Some("/users/7"));

        let inner = res.into_inner();
        assert_eq!(inner.status(), http::StatusCode::CREATED);
        assert_eq!(inner.headers()["content-type"], "application/json");
    }
}
