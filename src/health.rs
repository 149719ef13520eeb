//! Service status and health-check handlers.
//!
//! | Path | Question |
//! |---|---|
//! | `/` | Is this the Scribble API? |
//! | `/healthz` | Is the process alive? Failure → restart. |
//! | `/readyz` | Can it serve traffic? Failure → pulled from the load balancer. |
//!
//! None of them touch application state; the store is in memory and always
//! ready once the process is up.

use serde_json::json;

use crate::{Json, Request};

/// `{"status":"ok","message":"Scribble API is running"}`
pub async fn status(_req: Request) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "Scribble API is running" }))
}

/// Liveness check. If the process can answer HTTP at all, it is alive.
pub async fn liveness(_req: Request) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness check.
pub async fn readiness(_req: Request) -> Json<serde_json::Value> {
    Json(json!({ "status": "ready" }))
}
