//! HTTP method as a typed enum.
//!
//! The four methods the service routes get their own variant. Anything else
//! the client sends is carried as [`Method::Other`] so it still travels the
//! whole middleware chain; the router answers it with `405`.

use std::fmt;

/// An HTTP method.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Delete,
    Get,
    Post,
    Put,
    /// Any other method token, kept verbatim (e.g. `"PATCH"`, `"PURGE"`).
    Other(String),
}

impl Method {
    /// Returns the wire representation (e.g. `"GET"`).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Other(token) => token,
        }
    }
}

/// Case-sensitive per RFC 9110 §9.1: `"get"` is an unknown method, not `GET`.
impl From<&str> for Method {
    fn from(s: &str) -> Self {
        match s {
            "DELETE" => Self::Delete,
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<&http::Method> for Method {
    fn from(m: &http::Method) -> Self {
        m.as_str().into()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_routed_methods_case_sensitively() {
        assert_eq!(Method::from("PUT"), Method::Put);
        assert_eq!(Method::from("put"), Method::Other("put".into()));
    }

    #[test]
    fn unknown_methods_are_kept_verbatim() {
        let purge = Method::from(&http::Method::from_bytes(b"PURGE").unwrap());
        assert_eq!(purge, Method::Other("PURGE".into()));
        assert_eq!(purge.to_string(), "PURGE");
        assert_eq!(Method::from(&http::Method::DELETE), Method::Delete);
    }
}
