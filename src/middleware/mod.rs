//! Middleware layer.
//!
//! Cross-cutting request handling that runs around every handler inside
//! [`Router::handle`](crate::Router::handle), outermost first:
//!
//! - [`trace`]: per-request span with method and path, completion event with
//!   status and latency
//! - [`cors`]: preflight answers and open CORS headers
//! - [`trailing_slash`]: 301 from `/path/` to `/path` when only the trimmed
//!   form is routed

pub mod cors;
pub mod trace;
pub mod trailing_slash;

pub use cors::Cors;
