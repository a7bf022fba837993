//! Application assembly: routes plus the fixed middleware order.

use std::future::Future;
use std::sync::Arc;

use crate::config::Config;
use crate::health::{self, HEALTH_PATH};
use crate::method::Method;
use crate::middleware::{self, Auth, BoxedStage, Next, Stage};
use crate::registry::Registry;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::users;

/// A router wrapped in an ordered list of middleware stages.
///
/// Cheap to clone; the server hands one clone to every connection task.
#[derive(Clone)]
pub struct App {
    stages: Arc<[BoxedStage]>,
    router: Arc<Router>,
}

impl App {
    pub fn new(router: Router) -> Self {
        Self {
            stages: Vec::<BoxedStage>::new().into(),
            router: Arc::new(router),
        }
    }

    /// Appends a stage inside every stage added before it.
    pub fn stage(mut self, stage: impl Stage) -> Self {
        let mut stages = self.stages.to_vec();
        stages.push(Arc::new(stage));
        self.stages = stages.into();
        self
    }

    /// Runs one request through every stage and the router.
    pub async fn handle(&self, req: Request) -> Response {
        Next::new(Arc::clone(&self.stages), Arc::clone(&self.router))
            .run(req)
            .await
    }
}

/// Builds the user service.
///
/// Stage order is load-bearing: `recover` must wrap `Auth` so a fault while
/// authenticating still yields a JSON 500, and `log` sits innermost, around
/// routing and the handlers.
pub fn app(config: &Config, registry: Arc<Registry>) -> App {
    let router = Router::new()
        .on(Method::Get, HEALTH_PATH, health::health)
        .on(Method::Post, "/users", with(&registry, users::create))
        .on(Method::Get, "/users", with(&registry, users::list))
        .on(Method::Get, "/users/{id}", with(&registry, users::get))
        .on(Method::Put, "/users/{id}", with(&registry, users::update))
        .on(Method::Delete, "/users/{id}", with(&registry, users::delete));

    App::new(router)
        .stage(middleware::recover)
        .stage(Auth::bearer(&config.api_token))
        .stage(middleware::log)
}

/// Adapts a `(registry, request)` handler to the router's `(request)` shape.
fn with<F, Fut>(
    registry: &Arc<Registry>,
    handler: F,
) -> impl Fn(Request) -> Fut + Send + Sync + 'static
where
    F: Fn(Arc<Registry>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
{
    let registry = Arc::clone(registry);
    move |req: Request| handler(Arc::clone(&registry), req)
}
