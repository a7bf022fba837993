//! Health-check endpoint.
//!
//! `GET /health` answers `200 {"status":"Healthy"}` and is the only path the
//! [`Auth`](crate::middleware::Auth) stage lets through without a token, so
//! load balancers and orchestrators can call it unauthenticated. It
//! still passes through the error and logging stages.

use serde_json::json;

use crate::{Request, Response};

/// The one path exempt from authentication.
pub const HEALTH_PATH: &str = "/health";

/// If the process can answer HTTP at all it is healthy; this handler
/// deliberately has no dependencies.
pub async fn health(_req: Request) -> Response {
    Response::json(json!({ "status": "Healthy" }).to_string().into_bytes())
}
