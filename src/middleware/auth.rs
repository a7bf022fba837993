//! Static bearer-token authentication.

use tracing::debug;

use super::{Next, Stage};
use crate::handler::BoxFuture;
use crate::health::HEALTH_PATH;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Rejects requests whose `Authorization` header is not exactly
/// `Bearer <token>`.
///
/// The health-check path is let through untouched so health checkers never need the
/// secret. Rejections never reach the stages registered after this one.
pub struct Auth {
    expected: String,
    bypass: &'static str,
}

impl Auth {
    pub fn bearer(token: &str) -> Self {
        Self {
            expected: format!("Bearer {token}"),
            bypass: HEALTH_PATH,
        }
    }

    fn check(&self, req: &Request) -> Result<(), Response> {
        if req.path() == self.bypass {
            return Ok(());
        }
        match req.header("authorization") {
            None => Err(reject(req, "Authorization header missing")),
            Some(value) if value != self.expected => Err(reject(req, "Invalid or expired token")),
            Some(_) => Ok(()),
        }
    }
}

impl Stage for Auth {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        match self.check(&req) {
            Ok(()) => Box::pin(next.run(req)),
            Err(res) => Box::pin(async move { res }),
        }
    }
}

fn reject(req: &Request, reason: &'static str) -> Response {
    debug!(method = %req.method(), path = req.path(), reason, "request rejected");
    Response::error(Status::Unauthorized, reason)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::method::Method;
    use crate::middleware::BoxedStage;
    use crate::router::Router;

    fn chain(hits: &Arc<AtomicUsize>) -> Next {
        let counted = {
            let hits = Arc::clone(hits);
            move |_req: Request| {
                hits.fetch_add(1, Ordering::SeqCst);
                async { Status::NoContent }
            }
        };
        let router = Router::new()
            .on(Method::Get, "/users", counted)
            .on(Method::Get, HEALTH_PATH, |_req: Request| async { Status::Ok });
        let stages: Vec<BoxedStage> = vec![Arc::new(Auth::bearer("s3cret"))];
        Next::new(stages.into(), Arc::new(router))
    }

    fn error_of(res: Response) -> String {
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        body["error"].as_str().unwrap().to_owned()
    }

    #[tokio::test]
    async fn missing_header_is_rejected_before_the_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let res = chain(&hits).run(Request::test(Method::Get, "/users")).await;

        assert_eq!(res.status_code(), 401);
        assert_eq!(error_of(res), "Authorization header missing");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_token_is_rejected() {
        let hits = Arc::new(AtomicUsize::new(0));
        let req = Request::test(Method::Get, "/users").with_header("Authorization", "Bearer nope");
        let res = chain(&hits).run(req).await;

        assert_eq!(res.status_code(), 401);
        assert_eq!(error_of(res), "Invalid or expired token");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn token_must_match_exactly() {
        let hits = Arc::new(AtomicUsize::new(0));
        let req = Request::test(Method::Get, "/users").with_header("Authorization", "s3cret");
        assert_eq!(chain(&hits).run(req).await.status_code(), 401);
    }

    #[tokio::test]
    async fn non_utf8_credential_is_invalid_not_missing() {
        let (parts, ()) = http::Request::builder()
            .uri("/users")
            .header("authorization", http::HeaderValue::from_bytes(b"Bearer t\xc3\xb6k").unwrap())
            .body(())
            .unwrap()
            .into_parts();
        let req = Request::from_parts(Method::Get, parts, bytes::Bytes::new());

        let hits = Arc::new(AtomicUsize::new(0));
        let res = chain(&hits).run(req).await;

        assert_eq!(res.status_code(), 401);
        assert_eq!(error_of(res), "Invalid or expired token");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn correct_token_reaches_the_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let req =
            Request::test(Method::Get, "/users").with_header("authorization", "Bearer s3cret");
        let res = chain(&hits).run(req).await;

        assert_eq!(res.status_code(), 204);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn health_path_needs_no_header() {
        let hits = Arc::new(AtomicUsize::new(0));
        let res = chain(&hits).run(Request::test(Method::Get, HEALTH_PATH)).await;
        assert_eq!(res.status_code(), 200);
    }
}
