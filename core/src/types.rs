//! Domain types for the PetFriends API.
//!
//! # Design
//! The service owns its data model; this client deliberately does not. Pets
//! travel as raw JSON values inside `ApiBody`, mirroring the service's
//! pass-through contract: whatever status and body the server returns is what
//! the caller gets. The only typed values are `AuthKey` (the credential every
//! authenticated call carries) and `PetPhoto` (an in-memory photo payload).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// API key object returned by `GET /api/key`.
///
/// Sent as the `auth_key` header on every authenticated call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthKey {
    pub key: String,
}

/// An in-memory photo to attach to a pet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetPhoto {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PetPhoto {
    /// JPEG photo, the only format the service documents.
    pub fn jpeg(filename: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes,
        }
    }
}

/// A response body as the service returned it: parsed JSON when the payload
/// is valid JSON, the raw text otherwise (the service's error pages are
/// plain text or HTML).
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    Json(Value),
    Text(String),
}

impl ApiBody {
    /// Interpret a raw response body, falling back to text when it is not
    /// valid JSON.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => ApiBody::Json(value),
            Err(_) => ApiBody::Text(raw.to_string()),
        }
    }

    pub fn json(&self) -> Option<&Value> {
        match self {
            ApiBody::Json(value) => Some(value),
            ApiBody::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ApiBody::Json(_) => None,
            ApiBody::Text(text) => Some(text),
        }
    }

    /// True when the body is a JSON object containing `key`.
    pub fn has_key(&self, key: &str) -> bool {
        matches!(self, ApiBody::Json(Value::Object(map)) if map.contains_key(key))
    }

    /// Substring search over the body, whichever form it took.
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            ApiBody::Json(value) => value.to_string().contains(needle),
            ApiBody::Text(text) => text.contains(needle),
        }
    }

    /// Deserialize a JSON body into a concrete type.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        self.json()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}
