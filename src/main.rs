//! Static host for the built team site.
//!
//! Serves the `dist/` directory produced by the client build. Routing lives
//! in the URL fragment, so every page is served by the same `index.html`.

mod config;
mod routes;

use config::{HostConfig, HostError};

#[tokio::main]
async fn main() -> Result<(), HostError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let config = HostConfig::from_env()?;
    let addr = config.socket_addr()?;

    let app = routes::app(&config.dist_dir);
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|source| HostError::Bind { addr, source })?;

    tracing::info!(%addr, dist = %config.dist_dir.display(), "teamsite listening");
    axum::serve(listener, app).await.map_err(HostError::Serve)
}
