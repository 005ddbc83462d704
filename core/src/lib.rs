//! API client core for the PetFriends pet-management service.
//!
//! # Overview
//! Builds `HttpRequest` values and interprets `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//! The `petfriends` crate wraps this core with a blocking transport.
//!
//! # Design
//! - `PetFriendsApi` is stateless — it holds only `base_url`.
//! - One `build_*` method per service endpoint; responses are interpreted
//!   uniformly by `HttpResponse::into_reply` as a status plus JSON-or-text
//!   body, because the client is a pass-through and never classifies
//!   server-side failures.
//! - Multipart bodies are encoded in-crate (`MultipartForm`); the core has no
//!   HTTP library to delegate to.

pub mod client;
pub mod error;
pub mod http;
pub mod multipart;
pub mod types;

pub use client::{PetFriendsApi, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use multipart::MultipartForm;
pub use types::{ApiBody, AuthKey, PetPhoto};
