//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network — the caller (host) is responsible for executing
//! the actual I/O. This keeps the core deterministic and easy to test.
//!
//! Request bodies are raw bytes because two of the PetFriends endpoints take
//! `multipart/form-data` payloads carrying a binary photo. Response bodies
//! stay `String`: the service answers with JSON or plain text.

use crate::types::ApiBody;

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Built by `PetFriendsApi::build_*` methods. The caller is responsible for
/// executing this request against the network and returning the corresponding
/// `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Full URL including the base and any query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller after executing an `HttpRequest`, then split
/// with [`HttpResponse::into_reply`] for the JSON-or-text interpretation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Split into the `(status, body)` pair the client hands back, parsing
    /// the body as JSON-or-text.
    pub fn into_reply(self) -> (u16, ApiBody) {
        (self.status, ApiBody::parse(&self.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_reply_keeps_the_status_and_parses_json() {
        let response = HttpResponse {
            status: 200,
            body: r#"{"key":"c0ffee"}"#.to_string(),
        };
        let (status, body) = response.into_reply();
        assert_eq!(status, 200);
        assert!(body.has_key("key"));
    }

    #[test]
    fn into_reply_passes_error_pages_through_as_text() {
        let response = HttpResponse {
            status: 403,
            body: "403 Forbidden: wrong credentials".to_string(),
        };
        let (status, body) = response.into_reply();
        assert_eq!(status, 403);
        assert_eq!(body.text(), Some("403 Forbidden: wrong credentials"));
    }
}
