//! The blogging API: application state and the route table.
//!
//! | Operation | Routes |
//! |---|---|
//! | signup | `POST /api/signup`, `POST /api/v1/user/signup` |
//! | signin | `POST /api/signin`, `POST /api/v1/user/signin` |
//! | list blogs | `GET /api/blogs` (wrapped), `GET /api/v1/blog/bulk` (bare array) |
//! | get blog | `GET /api/v1/blog/{id}` |
//! | create blog | `POST /api/blog`, `POST /api/v1/blog` (bearer token) |
//!
//! Both path families stay registered because older and newer clients use
//! different ones.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::auth::{Auth, AuthError, Claims};
use crate::config::Config;
use crate::fixtures;
use crate::handler::Handler;
use crate::health;
use crate::middleware::Cors;
use crate::request::Request;
use crate::response::IntoResponse;
use crate::router::Router;
use crate::store::{Store, StoreError};

mod blogs;
mod debug;
mod error;
mod users;

pub use error::ApiError;

/// Everything a handler can reach. Built once at startup.
pub struct App {
    pub config: Config,
    pub store: Store,
    pub auth: Auth,
}

impl App {
    /// Builds a fresh, empty-or-seeded application from `config`.
    pub fn new(config: Config) -> Result<Self, StoreError> {
        let store = Store::new();
        let mut auth = Auth::new(&config.jwt_secret);
        if config.seed_fixtures {
            fixtures::seed(&store, &mut auth)?;
        }
        Ok(Self { config, store, auth })
    }

    /// Resolves the caller from the `Authorization` header.
    pub(crate) fn authenticate(&self, req: &Request) -> Result<Claims, ApiError> {
        self.auth.authenticate(req.header("authorization")).map_err(|e| {
            warn!(path = req.path(), "rejected request: {e}");
            match e {
                AuthError::MissingHeader => ApiError::unauthorized("Unauthorized - No auth header"),
                other => ApiError::unauthorized("Invalid token").with_details(other),
            }
        })
    }
}

/// The full route table for `app`.
pub fn routes(app: Arc<App>) -> Router {
    Router::new()
        .get("/", health::status)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
        .get("/debug", with(&app, debug::dump))
        .post("/api/signup", with(&app, users::signup))
        .post("/api/v1/user/signup", with(&app, users::signup))
        .post("/api/signin", with(&app, users::signin))
        .post("/api/v1/user/signin", with(&app, users::signin))
        .get("/api/blogs", with(&app, blogs::list_wrapped))
        .get("/api/v1/blog/bulk", with(&app, blogs::list_bulk))
        .get("/api/v1/blog/{id}", with(&app, blogs::get))
        .post("/api/blog", with(&app, blogs::create))
        .post("/api/v1/blog", with(&app, blogs::create))
        .cors(Cors::permissive())
        .trim_trailing_slash()
}

/// Adapts a state-taking handler to the router's `Fn(Request)` shape.
fn with<F, Fut, R>(app: &Arc<App>, f: F) -> impl Handler + use<F, Fut, R>
where
    F: Fn(Arc<App>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    let app = Arc::clone(app);
    move |req: Request| f(Arc::clone(&app), req)
}

/// Keeps a body field only if it is truthy in JavaScript terms: absent,
/// `null`, `false`, `0` and `""` all count as missing.
fn present(field: Option<Value>) -> Option<Value> {
    field.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Takes the string out of a present field. `None` for any other JSON type.
fn into_string(field: Value) -> Option<String> {
    match field {
        Value::String(s) => Some(s),
        _ => None,
    }
}
