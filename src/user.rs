//! User record and the request bodies that produce it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user. Only the [`Registry`](crate::Registry) creates or mutates these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /users` and `PUT /users/{id}`, as sent by the client.
///
/// Every field is optional at this layer so a missing field is reported as a
/// validation error rather than a malformed body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

/// A validated, normalized [`UserInput`], ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
}
