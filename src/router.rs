//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. The router is the
//! innermost link of the middleware chain: stages run first, then
//! [`Router::dispatch`] picks the handler. Every miss is answered here, so
//! it has already been authenticated and will be logged.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and hand it to [`App::new`](crate::App::new).
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Whether `path` is routed under any method at all.
    fn knows_path(&self, path: &str) -> bool {
        self.routes.values().any(|tree| tree.at(path).is_ok())
    }

    /// Routes one request to its handler.
    ///
    /// Misses are answered in place: `400` for a body that could not be read,
    /// `405` for a known path under the wrong method, `404` otherwise.
    pub(crate) async fn dispatch(&self, mut req: Request) -> Response {
        if req.body_error.is_some() {
            return Response::error(Status::BadRequest, "Invalid request body");
        }
        match self.lookup(req.method(), req.path()) {
            Some((handler, params)) => {
                req.set_params(params);
                handler.call(req).await
            }
            None if self.knows_path(req.path()) => {
                Response::error(Status::MethodNotAllowed, "Method not allowed")
            }
            None => Response::error(Status::NotFound, "Not found"),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
