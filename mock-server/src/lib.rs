//! In-process replica of the PetFriends pet-management service.
//!
//! Reproduces the hosted service's observable behavior so the client's test
//! suite runs hermetically, including the service's documented bugs:
//! ownership is never checked on update and delete, an unknown `filter`
//! value answers 500, and setting a photo on another user's pet answers 500
//! instead of 403.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Credentials of the seeded account the test suite logs in with.
pub const VALID_EMAIL: &str = "carol@petfriends.example";
pub const VALID_PASSWORD: &str = "correct-horse";

/// A second seeded account; its pets are "another user's pets" in tests.
pub const OTHER_EMAIL: &str = "rival@petfriends.example";
pub const OTHER_PASSWORD: &str = "battery-staple";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    pub animal_type: String,
    /// The service stores the age verbatim as a string.
    pub age: String,
    /// Base64 data URI, empty until a photo is uploaded.
    #[serde(default)]
    pub pet_photo: String,
    #[serde(skip)]
    pub(crate) owner: String,
}

/// Envelope for `GET /api/pets`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

/// Urlencoded payload shared by `create_pet_simple` and `update_pet`.
#[derive(Debug, Deserialize)]
struct PetForm {
    name: String,
    animal_type: String,
    age: String,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default)]
    filter: String,
}

#[derive(Default)]
struct Store {
    /// email -> password
    accounts: HashMap<String, String>,
    /// auth key -> email
    sessions: HashMap<String, String>,
    pets: Vec<Pet>,
}

type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let mut store = Store::default();
    store
        .accounts
        .insert(VALID_EMAIL.to_string(), VALID_PASSWORD.to_string());
    store
        .accounts
        .insert(OTHER_EMAIL.to_string(), OTHER_PASSWORD.to_string());
    // The hosted site always has other users' pets on its main page.
    store.pets.push(seed_pet("Barsik", "cat", "7"));
    store.pets.push(seed_pet("Rex", "dog", "4"));

    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/{id}", put(update_pet).delete(delete_pet))
        .route("/api/pets/set_photo/{id}", post(set_pet_photo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn seed_pet(name: &str, animal_type: &str, age: &str) -> Pet {
    Pet {
        id: Uuid::new_v4(),
        name: name.to_string(),
        animal_type: animal_type.to_string(),
        age: age.to_string(),
        pet_photo: String::new(),
        owner: OTHER_EMAIL.to_string(),
    }
}

/// Resolve the `auth_key` header to a logged-in account.
fn authenticated_user(store: &Store, headers: &HeaderMap) -> Option<String> {
    let key = headers.get("auth_key")?.to_str().ok()?;
    store.sessions.get(key).cloned()
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        "403 Forbidden: auth_key is missing or invalid",
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        "404 Not Found: pet with this id was not found",
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "500 Internal Server Error",
    )
        .into_response()
}

fn bad_request() -> Response {
    (
        StatusCode::BAD_REQUEST,
        "400 Bad Request: incomplete pet data",
    )
        .into_response()
}

fn data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", BASE64.encode(bytes))
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Response {
    let email = headers.get("email").and_then(|v| v.to_str().ok());
    let password = headers.get("password").and_then(|v| v.to_str().ok());

    let mut store = db.write().await;
    match (email, password) {
        (Some(email), Some(password))
            if store.accounts.get(email).map(String::as_str) == Some(password) =>
        {
            let key = Uuid::new_v4().simple().to_string();
            store.sessions.insert(key.clone(), email.to_string());
            tracing::info!(email, "issued auth key");
            Json(serde_json::json!({ "key": key })).into_response()
        }
        _ => {
            tracing::debug!("rejected credentials");
            (
                StatusCode::FORBIDDEN,
                "403 Forbidden: this user was not found in the database",
            )
                .into_response()
        }
    }
}

async fn list_pets(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Response {
    let store = db.read().await;
    let Some(user) = authenticated_user(&store, &headers) else {
        return forbidden();
    };

    let pets = match params.filter.as_str() {
        "" => store.pets.clone(),
        "my_pets" => store
            .pets
            .iter()
            .filter(|pet| pet.owner == user)
            .cloned()
            .collect(),
        // The hosted service crashes on any other filter value.
        other => {
            tracing::debug!(filter = other, "unsupported filter");
            return internal_error();
        }
    };
    Json(PetList { pets }).into_response()
}

async fn create_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let user = {
        let store = db.read().await;
        match authenticated_user(&store, &headers) {
            Some(user) => user,
            None => return forbidden(),
        }
    };

    let mut name = None;
    let mut animal_type = None;
    let mut age = None;
    let mut photo = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let field_name = field.name().map(str::to_string);
                match field_name.as_deref() {
                    Some("name") => name = field.text().await.ok(),
                    Some("animal_type") => animal_type = field.text().await.ok(),
                    Some("age") => age = field.text().await.ok(),
                    Some("pet_photo") => {
                        let content_type =
                            field.content_type().unwrap_or("image/jpeg").to_string();
                        match field.bytes().await {
                            Ok(bytes) => photo = Some(data_uri(&content_type, &bytes)),
                            Err(_) => return bad_request(),
                        }
                    }
                    _ => {
                        // Drain unknown parts.
                        let _ = field.bytes().await;
                    }
                }
            }
            Ok(None) => break,
            Err(_) => return bad_request(),
        }
    }

    let (Some(name), Some(animal_type), Some(age), Some(pet_photo)) =
        (name, animal_type, age, photo)
    else {
        return bad_request();
    };

    let pet = Pet {
        id: Uuid::new_v4(),
        name,
        animal_type,
        age,
        pet_photo,
        owner: user,
    };
    db.write().await.pets.push(pet.clone());
    tracing::info!(pet = %pet.id, "created pet with photo");
    Json(pet).into_response()
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(input): Form<PetForm>,
) -> Response {
    let mut store = db.write().await;
    let Some(user) = authenticated_user(&store, &headers) else {
        return forbidden();
    };

    let pet = Pet {
        id: Uuid::new_v4(),
        name: input.name,
        animal_type: input.animal_type,
        age: input.age,
        pet_photo: String::new(),
        owner: user,
    };
    store.pets.push(pet.clone());
    tracing::info!(pet = %pet.id, "created pet");
    Json(pet).into_response()
}

async fn update_pet(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Form(input): Form<PetForm>,
) -> Response {
    let mut store = db.write().await;
    if authenticated_user(&store, &headers).is_none() {
        return forbidden();
    }

    // Known service bug, reproduced on purpose: ownership is never checked,
    // so any authenticated user can update any pet.
    let Some(pet) = store.pets.iter_mut().find(|pet| pet.id == id) else {
        return not_found();
    };
    pet.name = input.name;
    pet.animal_type = input.animal_type;
    pet.age = input.age;
    Json(pet.clone()).into_response()
}

async fn delete_pet(State(db): State<Db>, Path(id): Path<Uuid>, headers: HeaderMap) -> Response {
    let mut store = db.write().await;
    if authenticated_user(&store, &headers).is_none() {
        return forbidden();
    }

    // Same authorization bug as update: any pet can be deleted.
    let before = store.pets.len();
    store.pets.retain(|pet| pet.id != id);
    if store.pets.len() == before {
        return not_found();
    }
    tracing::info!(pet = %id, "deleted pet");
    // The service answers 200 with an empty body, not a confirmation message.
    (StatusCode::OK, "").into_response()
}

async fn set_pet_photo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let user = {
        let store = db.read().await;
        match authenticated_user(&store, &headers) {
            Some(user) => user,
            None => return forbidden(),
        }
    };

    let mut photo = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let field_name = field.name().map(str::to_string);
                if field_name.as_deref() == Some("pet_photo") {
                    let content_type = field.content_type().unwrap_or("image/jpeg").to_string();
                    match field.bytes().await {
                        Ok(bytes) => photo = Some(data_uri(&content_type, &bytes)),
                        Err(_) => return bad_request(),
                    }
                } else {
                    let _ = field.bytes().await;
                }
            }
            Ok(None) => break,
            Err(_) => return bad_request(),
        }
    }
    let Some(photo) = photo else {
        return bad_request();
    };

    let mut store = db.write().await;
    let Some(pet) = store.pets.iter_mut().find(|pet| pet.id == id) else {
        return not_found();
    };
    // Known service bug, reproduced on purpose: a photo upload for another
    // user's pet crashes with 500 instead of answering 403.
    if pet.owner != user {
        return internal_error();
    }
    pet.pet_photo = photo;
    Json(pet.clone()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pet_serializes_age_as_a_string() {
        let pet = seed_pet("Barsik", "cat", "7");
        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["name"], "Barsik");
        assert_eq!(json["animal_type"], "cat");
        assert_eq!(json["age"], "7");
        assert_eq!(json["pet_photo"], "");
        assert!(json.get("owner").is_none(), "owner must never leak");
    }

    #[test]
    fn pet_form_rejects_missing_fields() {
        let result: Result<PetForm, _> = serde_urlencoded::from_str("name=Barsik&age=7");
        assert!(result.is_err());
    }

    #[test]
    fn pet_form_parses_a_full_form() {
        let form: PetForm =
            serde_urlencoded::from_str("name=Barsik&animal_type=cat&age=7").unwrap();
        assert_eq!(form.name, "Barsik");
        assert_eq!(form.animal_type, "cat");
        assert_eq!(form.age, "7");
    }

    #[test]
    fn data_uri_embeds_the_content_type() {
        let uri = data_uri("image/jpeg", &[0xff, 0xd8]);
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }
}
