//! # usersvc
//!
//! An in-memory user registry served over HTTP, behind a fixed middleware
//! pipeline.
//!
//! ## Request path
//!
//! ```text
//! hyper ─▶ recover ─▶ Auth ─▶ log ─▶ Router ─▶ users::{create, list, get, update, delete}
//!                                          └─▶ health::health
//! ```
//!
//! - [`middleware::recover`] turns any panic further in into a JSON 500.
//! - [`middleware::Auth`] requires `Authorization: Bearer <token>` on every
//!   path except `/health`.
//! - [`middleware::log`] emits one `tracing` event per request it sees.
//!
//! The order is fixed by [`app`]. `log` is innermost, so requests rejected by
//! `Auth` and panics converted by `recover` do not show up in its output.
//!
//! ## Endpoints
//!
//! | Method | Path | Success | Errors |
//! |---|---|---|---|
//! | `POST` | `/users` | 201 + `Location` | 400, 500 |
//! | `GET` | `/users` | 200 | |
//! | `GET` | `/users/{id}` | 200 | 404 |
//! | `PUT` | `/users/{id}` | 200 | 400, 404, 500 |
//! | `DELETE` | `/users/{id}` | 204 | 404 |
//! | `GET` | `/health` | 200 | |
//!
//! Every error body is `{"error": "..."}`; the recovery stage adds `details`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use usersvc::{Config, Registry, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), usersvc::Error> {
//!     let config = Config::from_env()?;
//!     let app = usersvc::app(&config, Arc::new(Registry::new()));
//!     Server::bind(config.addr).serve(app).await
//! }
//! ```

mod app;
mod config;
mod error;
mod handler;
mod method;
mod registry;
mod request;
mod response;
mod router;
mod server;
mod status;
mod user;

pub mod health;
pub mod middleware;
pub mod users;
pub mod validation;

pub use app::{App, app};
pub use config::Config;
pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use method::Method;
pub use registry::{Registry, RegistryError};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use user::{NewUser, User, UserInput};
