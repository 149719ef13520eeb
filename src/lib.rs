//! # scribble
//!
//! An in-memory blogging API: signup and signin with signed session tokens,
//! and published blog posts that can be listed, fetched and created.
//!
//! Nothing is persisted. Users and posts live in a [`store::Store`] for the
//! life of the process; a restart starts over from the seeded
//! [`fixtures`].
//!
//! The crate carries its own small HTTP layer on hyper:
//!
//! - Radix-tree routing via [`matchit`], one tree per method
//! - Handlers are plain `async fn(Request) -> impl IntoResponse`
//! - Middleware for tracing, open CORS and trailing-slash redirects
//! - Graceful shutdown on SIGTERM / Ctrl-C, draining in-flight requests
//!
//! ## Running it
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use scribble::{Server, api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let addr = config.bind_addr;
//!     let app = Arc::new(api::App::new(config)?);
//!
//!     Server::bind(addr).serve(api::routes(app)).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod auth;
pub mod config;
pub mod fixtures;
pub mod health;
pub mod middleware;
pub mod store;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
