//! Scribble API server.
//!
//! ```text
//! JWT_PASSWORD=change-me RUST_LOG=info cargo run
//!
//! curl -X POST http://localhost:8787/api/signup \
//!      -H 'content-type: application/json' \
//!      -d '{"email":"a@b.com","password":"p","name":"A"}'
//! curl http://localhost:8787/api/v1/blog/bulk
//! ```

use std::sync::Arc;

use anyhow::Context;
use scribble::config::Config;
use scribble::{Server, api};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    let addr = config.bind_addr;
    let app = Arc::new(api::App::new(config).context("failed to seed fixtures")?);

    Server::bind(addr).serve(api::routes(app)).await?;
    Ok(())
}
