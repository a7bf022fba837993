//! CRUD handlers for `/users`.
//!
//! Each handler is a one-shot async function of the shared [`Registry`] and
//! the request. Expected failures (bad input, unknown id) come back as
//! [`ApiError`] values and are rendered as `{"error": "..."}`; nothing here
//! panics on bad input.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, warn};

use crate::registry::{Registry, RegistryError};
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::status::Status;
use crate::user::{NewUser, User, UserInput};
use crate::validation::{self, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request body")]
    InvalidBody,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("User not found")]
    NotFound,
    #[error("Failed to create user")]
    CreateFailed,
    #[error("Failed to update user")]
    UpdateFailed,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            Self::InvalidBody | Self::Validation(_) => Status::BadRequest,
            Self::NotFound => Status::NotFound,
            Self::CreateFailed | Self::UpdateFailed | Self::Internal(_) => {
                Status::InternalServerError
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Response::error(self.status(), self.to_string())
    }
}

type Result<T> = std::result::Result<T, ApiError>;

/// `POST /users` → `201` with `Location: /users/{id}`.
pub async fn create(registry: Arc<Registry>, req: Request) -> Result<Response> {
    let candidate = validated_body(&req)?;
    let user = registry.create(candidate).map_err(create_error)?;

    Ok(Response::builder()
        .status(Status::Created)
        .header("location", &format!("/users/{}", user.id))
        .json(to_json(&user)?))
}

/// `GET /users` → every record, ordered by id.
pub async fn list(registry: Arc<Registry>, _req: Request) -> Json<Vec<User>> {
    let mut users = registry.all();
    users.sort_unstable_by_key(|u| u.id);
    Json(users)
}

/// `GET /users/{id}`.
pub async fn get(registry: Arc<Registry>, req: Request) -> Result<Response> {
    let id = user_id(&req)?;
    let user = registry.get(id).map_err(|_| ApiError::NotFound)?;
    Ok(Response::json(to_json(&user)?))
}

/// `PUT /users/{id}` → replaces username, email and full name.
pub async fn update(registry: Arc<Registry>, req: Request) -> Result<Response> {
    let id = user_id(&req)?;
    let candidate = validated_body(&req)?;
    let user = registry.update(id, candidate).map_err(update_error)?;
    Ok(Response::json(to_json(&user)?))
}

/// `DELETE /users/{id}` → `204`.
pub async fn delete(registry: Arc<Registry>, req: Request) -> Result<Status> {
    let id = user_id(&req)?;
    registry.delete(id).map_err(|_| ApiError::NotFound)?;
    Ok(Status::NoContent)
}

/// Ids are plain decimal digits; anything else (`+1`, `-1`, `1.0`) cannot
/// name a user.
fn user_id(req: &Request) -> Result<u64> {
    req.param("id")
        .filter(|raw| !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|raw| raw.parse().ok())
        .ok_or(ApiError::NotFound)
}

/// Any registry failure on insert is a server-side fault.
fn create_error(e: RegistryError) -> ApiError {
    error!(error = %e, "insert failed");
    ApiError::CreateFailed
}

fn update_error(e: RegistryError) -> ApiError {
    match e {
        RegistryError::NotFound(_) => ApiError::NotFound,
        RegistryError::Conflict(id) => {
            warn!(id, "update lost a race with a concurrent write");
            ApiError::UpdateFailed
        }
    }
}

fn validated_body(req: &Request) -> Result<NewUser> {
    let input: UserInput = req.json().map_err(|_| ApiError::InvalidBody)?;
    Ok(validation::validate(input)?)
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| ApiError::Internal(e.to_string()))
}
