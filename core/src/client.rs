//! Stateless HTTP request builder for the PetFriends API.
//!
//! # Design
//! `PetFriendsApi` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint gets a `build_*` method that produces an
//! `HttpRequest`; the caller executes the round-trip and interprets the
//! result with `ApiBody::parse`. There is no per-endpoint parse step because
//! the service's contract is uniform: whatever status and body come back are
//! handed to the caller unchanged.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::multipart::MultipartForm;
use crate::types::{AuthKey, PetPhoto};

/// Base URL of the hosted PetFriends service.
pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Stateless request builder for the PetFriends API.
///
/// Builds `HttpRequest` values without touching the network. The caller is
/// responsible for executing the HTTP round-trip.
#[derive(Debug, Clone)]
pub struct PetFriendsApi {
    base_url: String,
}

impl PetFriendsApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /api/key` — credentials travel as `email`/`password` headers.
    pub fn build_get_api_key(&self, email: &str, password: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/key", self.base_url),
            headers: vec![
                ("email".to_string(), email.to_string()),
                ("password".to_string(), password.to_string()),
            ],
            body: None,
        }
    }

    /// `GET /api/pets?filter=` — `""` lists every pet on the site, `my_pets`
    /// only the caller's. The service 500s on any other filter value.
    pub fn build_list_pets(&self, auth: &AuthKey, filter: &str) -> Result<HttpRequest, ApiError> {
        let query = serde_urlencoded::to_string([("filter", filter)])
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/pets?{query}", self.base_url),
            headers: vec![auth_header(auth)],
            body: None,
        })
    }

    /// `POST /api/pets` — multipart form with the pet's fields and photo.
    pub fn build_add_pet(
        &self,
        auth: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
        photo: &PetPhoto,
    ) -> HttpRequest {
        let form = MultipartForm::new()
            .text("name", name)
            .text("animal_type", animal_type)
            .text("age", age)
            .file("pet_photo", &photo.filename, &photo.content_type, &photo.bytes);
        let content_type = form.content_type();
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/pets", self.base_url),
            headers: vec![
                auth_header(auth),
                ("content-type".to_string(), content_type),
            ],
            body: Some(form.finish()),
        }
    }

    /// `POST /api/create_pet_simple` — photo-less creation, urlencoded form.
    pub fn build_add_pet_simple(
        &self,
        auth: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/create_pet_simple", self.base_url),
            headers: vec![
                auth_header(auth),
                ("content-type".to_string(), FORM_URLENCODED.to_string()),
            ],
            body: Some(pet_form(name, animal_type, age)?),
        })
    }

    /// `PUT /api/pets/{pet_id}` — replaces name, type and age.
    pub fn build_update_pet(
        &self,
        auth: &AuthKey,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: format!("{}/api/pets/{pet_id}", self.base_url),
            headers: vec![
                auth_header(auth),
                ("content-type".to_string(), FORM_URLENCODED.to_string()),
            ],
            body: Some(pet_form(name, animal_type, age)?),
        })
    }

    /// `DELETE /api/pets/{pet_id}` — the service answers 200 with an empty
    /// body rather than a confirmation message.
    pub fn build_delete_pet(&self, auth: &AuthKey, pet_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/api/pets/{pet_id}", self.base_url),
            headers: vec![auth_header(auth)],
            body: None,
        }
    }

    /// `POST /api/pets/set_photo/{pet_id}` — adds or replaces the photo.
    pub fn build_set_photo(&self, auth: &AuthKey, pet_id: &str, photo: &PetPhoto) -> HttpRequest {
        let form = MultipartForm::new().file(
            "pet_photo",
            &photo.filename,
            &photo.content_type,
            &photo.bytes,
        );
        let content_type = form.content_type();
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/pets/set_photo/{pet_id}", self.base_url),
            headers: vec![
                auth_header(auth),
                ("content-type".to_string(), content_type),
            ],
            body: Some(form.finish()),
        }
    }
}

fn auth_header(auth: &AuthKey) -> (String, String) {
    ("auth_key".to_string(), auth.key.clone())
}

fn pet_form(name: &str, animal_type: &str, age: &str) -> Result<Vec<u8>, ApiError> {
    let form = serde_urlencoded::to_string([
        ("name", name),
        ("animal_type", animal_type),
        ("age", age),
    ])
    .map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(form.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> PetFriendsApi {
        PetFriendsApi::new("http://localhost:3000")
    }

    fn auth() -> AuthKey {
        AuthKey {
            key: "c0ffee".to_string(),
        }
    }

    fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
        req.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn get_api_key_sends_credentials_as_headers() {
        let req = api().build_get_api_key("user@example.com", "hunter2");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/key");
        assert_eq!(header(&req, "email"), Some("user@example.com"));
        assert_eq!(header(&req, "password"), Some("hunter2"));
        assert!(req.body.is_none());
    }

    #[test]
    fn list_pets_puts_the_filter_in_the_query() {
        let req = api().build_list_pets(&auth(), "my_pets").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/pets?filter=my_pets");
        assert_eq!(header(&req, "auth_key"), Some("c0ffee"));
    }

    #[test]
    fn list_pets_empty_filter_is_still_sent() {
        let req = api().build_list_pets(&auth(), "").unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/pets?filter=");
    }

    #[test]
    fn list_pets_filter_is_urlencoded() {
        let req = api().build_list_pets(&auth(), "my pets&x=1").unwrap();
        assert_eq!(
            req.url,
            "http://localhost:3000/api/pets?filter=my+pets%26x%3D1"
        );
    }

    #[test]
    fn add_pet_builds_a_multipart_body() {
        let photo = PetPhoto::jpeg("grumpy.jpg", vec![0xff, 0xd8, 0xff, 0xd9]);
        let req = api().build_add_pet(&auth(), "Tar-Tar", "cat", "10", &photo);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/pets");
        assert_eq!(header(&req, "auth_key"), Some("c0ffee"));

        let content_type = header(&req, "content-type").unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));

        let body = String::from_utf8_lossy(req.body.as_deref().unwrap()).into_owned();
        assert!(body.contains("name=\"name\"\r\n\r\nTar-Tar"));
        assert!(body.contains("name=\"animal_type\"\r\n\r\ncat"));
        assert!(body.contains("name=\"age\"\r\n\r\n10"));
        assert!(body.contains("name=\"pet_photo\"; filename=\"grumpy.jpg\""));
        assert!(body.contains("Content-Type: image/jpeg"));
    }

    #[test]
    fn add_pet_simple_builds_an_urlencoded_form() {
        let req = api()
            .build_add_pet_simple(&auth(), "Tar-Tar", "cat", "10")
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/create_pet_simple");
        assert_eq!(
            header(&req, "content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            req.body.as_deref(),
            Some(&b"name=Tar-Tar&animal_type=cat&age=10"[..])
        );
    }

    #[test]
    fn update_pet_targets_the_pet_id() {
        let req = api()
            .build_update_pet(&auth(), "abc123", "Murzik", "dog", "3")
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/api/pets/abc123");
        assert_eq!(
            req.body.as_deref(),
            Some(&b"name=Murzik&animal_type=dog&age=3"[..])
        );
    }

    #[test]
    fn update_pet_form_values_are_urlencoded() {
        let req = api()
            .build_update_pet(&auth(), "abc123", "Tar Tar & Co", "cat", "10")
            .unwrap();
        let body = String::from_utf8(req.body.unwrap()).unwrap();
        assert_eq!(body, "name=Tar+Tar+%26+Co&animal_type=cat&age=10");
    }

    #[test]
    fn delete_pet_has_no_body() {
        let req = api().build_delete_pet(&auth(), "abc123");
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/api/pets/abc123");
        assert!(req.body.is_none());
    }

    #[test]
    fn set_photo_is_a_single_part_multipart() {
        let photo = PetPhoto::jpeg("grumpy2.jpg", vec![1, 2, 3]);
        let req = api().build_set_photo(&auth(), "abc123", &photo);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/pets/set_photo/abc123");
        let body = String::from_utf8_lossy(req.body.as_deref().unwrap()).into_owned();
        assert!(body.contains("name=\"pet_photo\"; filename=\"grumpy2.jpg\""));
        assert!(!body.contains("name=\"name\""));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let api = PetFriendsApi::new("http://localhost:3000/");
        let req = api.build_get_api_key("a", "b");
        assert_eq!(req.url, "http://localhost:3000/api/key");
    }
}
