//! Outermost stage: converts downstream panics into a JSON 500.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde_json::json;
use tracing::error;

use super::Next;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Runs the rest of the chain inside a panic boundary.
///
/// A panic in any stage or handler registered after this one is caught here
/// and answered with `500 {"error": "...", "details": <panic message>}`. The
/// panic does not reach hyper, so the connection stays usable.
pub async fn recover(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.path().to_owned();

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(res) => res,
        Err(payload) => {
            let details = panic_message(payload.as_ref());
            error!(%method, %path, %details, "unhandled fault");
            fault_response(&details)
        }
    }
}

fn fault_response(details: &str) -> Response {
    let body = json!({
        "error": "An unexpected error occurred",
        "details": details,
    });
    Response::builder()
        .status(Status::InternalServerError)
        .json(body.to_string().into_bytes())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown fault".to_owned()
    }
}
