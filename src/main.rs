use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use usersvc::{Config, Registry, Server};

#[tokio::main]
async fn main() -> Result<(), usersvc::Error> {
    init_tracing();

    let config = Config::from_env()?;
    let app = usersvc::app(&config, Arc::new(Registry::new()));

    Server::bind(config.addr).serve(app).await
}

/// Plain-text logs to stdout, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
