//! HTTP request and response types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `MovieApi` builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network;
//! whichever `Transport` the caller picks performs the round-trip. The same
//! types cross the FFI boundary, where the native host does the I/O itself.
//!
//! Bodies are bytes because poster images share the same response type as
//! JSON payloads.

/// HTTP method for a request. The movie API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: String) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
        }
    }
}

/// An HTTP response described as plain data.
///
/// Any status received from the server, 4xx and 5xx included, is a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_inclusive() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(299, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(!HttpResponse::new(300, "").is_success());
        assert!(!HttpResponse::new(503, "").is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let mut response = HttpResponse::new(200, "");
        response
            .headers
            .push(("Content-Type".to_string(), "image/jpeg".to_string()));
        assert_eq!(response.header("content-type"), Some("image/jpeg"));
        assert_eq!(response.header("etag"), None);
    }
}
