//! Middleware layer.
//!
//! A [`Stage`] sees every request before the router does and every response
//! after it. Stages are registered on [`App`](crate::App) in order, outermost
//! first, and composed into one call chain at startup:
//!
//! ```text
//! recover ─▶ Auth ─▶ log ─▶ Router::dispatch ─▶ handler
//! ```
//!
//! Each stage decides whether to call [`Next::run`]. Returning a response
//! without calling it short-circuits everything further in.
//!
//! Built-in stages:
//! - [`recover`]: turns a panic anywhere downstream into a JSON 500
//! - [`Auth`]: static bearer-token check with a health-check bypass
//! - [`log`]: one `tracing` event per request with method, path, status

mod auth;
mod logging;
mod recover;

use std::future::Future;
use std::sync::Arc;

use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

pub use auth::Auth;
pub use logging::log;
pub use recover::recover;

/// One layer of the request pipeline: `(Request, Next) -> Response`.
///
/// Implemented automatically for `async fn(Request, Next) -> Response`;
/// implement it by hand when the stage carries configuration (see [`Auth`]).
pub trait Stage: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

impl<F, Fut> Stage for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        Box::pin(self(req, next))
    }
}

pub(crate) type BoxedStage = Arc<dyn Stage>;

/// The rest of the chain, from the calling stage's point of view.
pub struct Next {
    stages: Arc<[BoxedStage]>,
    index: usize,
    router: Arc<Router>,
}

impl Next {
    pub(crate) fn new(stages: Arc<[BoxedStage]>, router: Arc<Router>) -> Self {
        Self {
            stages,
            index: 0,
            router,
        }
    }

    /// Runs the next stage, or the router once every stage has been entered.
    pub async fn run(self, req: Request) -> Response {
        let Some(stage) = self.stages.get(self.index).map(Arc::clone) else {
            return self.router.dispatch(req).await;
        };
        let next = Next {
            stages: self.stages,
            index: self.index + 1,
            router: self.router,
        };
        stage.call(req, next).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::method::Method;
    use crate::status::Status;

    type Trace = Arc<Mutex<Vec<String>>>;

    fn tracer(trace: &Trace, name: &'static str) -> impl Stage {
        let trace = Arc::clone(trace);
        move |req: Request, next: Next| {
            let trace = Arc::clone(&trace);
            async move {
                trace.lock().unwrap().push(format!("enter {name}"));
                let res = next.run(req).await;
                trace.lock().unwrap().push(format!("leave {name}"));
                res
            }
        }
    }

    #[tokio::test]
    async fn stages_nest_in_registration_order() {
        let trace: Trace = Arc::default();
        let stages: Vec<BoxedStage> = vec![
            Arc::new(tracer(&trace, "outer")),
            Arc::new(tracer(&trace, "inner")),
        ];
        let router = Router::new().on(Method::Get, "/ping", |_req: Request| async {
            Status::NoContent
        });

        let res = Next::new(stages.into(), Arc::new(router))
            .run(Request::test(Method::Get, "/ping"))
            .await;

        assert_eq!(res.status_code(), 204);
        assert_eq!(
            *trace.lock().unwrap(),
            ["enter outer", "enter inner", "leave inner", "leave outer"],
        );
    }

    #[tokio::test]
    async fn empty_chain_goes_straight_to_router() {
        let res = Next::new(Vec::<BoxedStage>::new().into(), Arc::new(Router::new()))
            .run(Request::test(Method::Get, "/anything"))
            .await;
        assert_eq!(res.status_code(), 404);
    }
}
