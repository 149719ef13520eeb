//! Per-request tracing.

use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, info, info_span};

use crate::response::Response;

/// Runs `fut` inside a `request` span and logs the outcome when it resolves.
pub(crate) async fn instrument<F>(method: &str, path: &str, fut: F) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!("request", method, path);
    let started = Instant::now();

    let res = fut.instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = res.status_code(),
            latency_us = started.elapsed().as_micros() as u64,
            "request completed",
        );
    });
    res
}
