//! Error type for the PetFriends request builders.
//!
//! # Design
//! The client is a pass-through: server-side failures are not errors here,
//! they come back to the caller as a status code and body. The only thing
//! that can fail inside the core is assembling a request locally, so the enum
//! stays small.

use std::fmt;

/// Errors returned by `PetFriendsApi` build methods.
#[derive(Debug)]
pub enum ApiError {
    /// A query string or form body could not be urlencoded.
    Serialization(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Serialization(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
