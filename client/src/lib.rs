//! Blocking HTTP client for the PetFriends pet-management service.
//!
//! # Design
//! `PetFriends` is a thin transport wrapper around `petfriends-core`: every
//! method builds a request through the core, executes it synchronously with
//! ureq, and returns the server's answer as a `(status, body)` pair. Server
//! failures are not `Err` — ureq's status-as-error behavior is disabled so
//! 4xx/5xx responses come back as data, exactly what the service returned.
//! The `Err` arm covers only local problems: an unreadable photo file, a form
//! that would not encode, or a transport-level failure.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub use petfriends_core::{ApiBody, ApiError, AuthKey, PetPhoto, DEFAULT_BASE_URL};

use petfriends_core::{HttpMethod, HttpRequest, HttpResponse, PetFriendsApi};

/// Errors raised by the blocking client. Server-side failures are not errors;
/// they are returned as a status code and body.
#[derive(Debug)]
pub enum Error {
    /// A request could not be assembled locally.
    Build(ApiError),

    /// A photo file could not be read.
    Io { path: PathBuf, source: io::Error },

    /// The HTTP round-trip itself failed (connection refused, DNS, TLS).
    Transport(ureq::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Build(err) => write!(f, "failed to build request: {err}"),
            Error::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Error::Transport(err) => write!(f, "transport error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Build(err) => Some(err),
            Error::Io { source, .. } => Some(source),
            Error::Transport(err) => Some(err),
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Build(err)
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        Error::Transport(err)
    }
}

/// Read a photo from disk into the in-memory form the API builders take.
///
/// The service only documents JPEG, so that is the content type used.
pub fn load_photo(path: &Path) -> Result<PetPhoto, Error> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pet_photo.jpg".to_string());
    Ok(PetPhoto::jpeg(&filename, bytes))
}

/// Synchronous client for the PetFriends API.
///
/// Every endpoint method returns the raw `(status, body)` the service
/// answered with; the body is parsed JSON when the payload was JSON and the
/// raw text otherwise.
pub struct PetFriends {
    agent: ureq::Agent,
    api: PetFriendsApi,
}

impl PetFriends {
    /// Client against an arbitrary base URL (tests point this at the mock
    /// server).
    pub fn new(base_url: &str) -> Self {
        // 4xx/5xx must come back as data, not Err: the caller asserts on them.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            api: PetFriendsApi::new(base_url),
        }
    }

    /// Client against the hosted service.
    pub fn hosted() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    /// `GET /api/key` — exchange credentials for an [`AuthKey`] object.
    /// Success is `(200, {"key": ...})`; bad credentials get a 403 text page.
    pub fn get_api_key(&self, email: &str, password: &str) -> Result<(u16, ApiBody), Error> {
        self.execute(self.api.build_get_api_key(email, password))
    }

    /// `GET /api/pets?filter=` — `""` for every pet on the site, `"my_pets"`
    /// for the caller's own.
    pub fn get_list_of_pets(&self, auth: &AuthKey, filter: &str) -> Result<(u16, ApiBody), Error> {
        self.execute(self.api.build_list_pets(auth, filter)?)
    }

    /// `POST /api/pets` — create a pet with a photo read from `photo_path`.
    pub fn add_new_pet(
        &self,
        auth: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
        photo_path: &Path,
    ) -> Result<(u16, ApiBody), Error> {
        let photo = load_photo(photo_path)?;
        self.execute(self.api.build_add_pet(auth, name, animal_type, age, &photo))
    }

    /// `POST /api/create_pet_simple` — create a pet without a photo.
    pub fn add_pet_simple(
        &self,
        auth: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<(u16, ApiBody), Error> {
        self.execute(self.api.build_add_pet_simple(auth, name, animal_type, age)?)
    }

    /// `PUT /api/pets/{pet_id}` — replace a pet's name, type and age.
    pub fn update_pet_info(
        &self,
        auth: &AuthKey,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<(u16, ApiBody), Error> {
        self.execute(
            self.api
                .build_update_pet(auth, pet_id, name, animal_type, age)?,
        )
    }

    /// `DELETE /api/pets/{pet_id}` — the service answers 200 with an empty
    /// body.
    pub fn delete_pet(&self, auth: &AuthKey, pet_id: &str) -> Result<(u16, ApiBody), Error> {
        self.execute(self.api.build_delete_pet(auth, pet_id))
    }

    /// `POST /api/pets/set_photo/{pet_id}` — add or replace a pet's photo.
    pub fn set_pet_photo(
        &self,
        auth: &AuthKey,
        pet_id: &str,
        photo_path: &Path,
    ) -> Result<(u16, ApiBody), Error> {
        let photo = load_photo(photo_path)?;
        self.execute(self.api.build_set_photo(auth, pet_id, &photo))
    }

    /// Execute a core-built request and interpret the answer as JSON-or-text.
    fn execute(&self, req: HttpRequest) -> Result<(u16, ApiBody), Error> {
        let headers = &req.headers;
        let mut response = match (req.method, req.body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&req.url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&req.url), headers).call(),
            (HttpMethod::Post, Some(bytes)) => {
                with_headers(self.agent.post(&req.url), headers).send(&bytes[..])
            }
            (HttpMethod::Post, None) => {
                with_headers(self.agent.post(&req.url), headers).send_empty()
            }
            (HttpMethod::Put, Some(bytes)) => {
                with_headers(self.agent.put(&req.url), headers).send(&bytes[..])
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(&req.url), headers).send_empty(),
        }
        .map_err(Error::Transport)?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();
        Ok(HttpResponse { status, body }.into_reply())
    }
}

/// Copy the core-built header list onto a ureq request builder.
fn with_headers<Any>(
    mut builder: ureq::RequestBuilder<Any>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<Any> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
