//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The client build writes `index.html` plus content-hashed scripts, wasm
//! and styles into one directory. Hashed files never change under the same
//! name and are cached for a year; everything else is revalidated so a new
//! deploy is picked up on the next load.

use std::path::Path;

use axum::Router;
use axum::extract::Request;
use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

const IMMUTABLE: &str = "public, max-age=31536000, immutable";
const REVALIDATE: &str = "no-cache";

/// Minimum length of the hex hash the build appends to file names.
const MIN_HASH_LEN: usize = 8;

pub fn app(dist_dir: &Path) -> Router {
    let site = ServeDir::new(dist_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(site)
        .layer(middleware::from_fn(cache_control))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn cache_control(request: Request, next: Next) -> Response {
    let hashed = is_hashed_asset(request.uri().path());
    let mut response = next.run(request).await;
    if response.status().is_success() {
        let value = if hashed { IMMUTABLE } else { REVALIDATE };
        response.headers_mut().insert(CACHE_CONTROL, HeaderValue::from_static(value));
    }
    response
}

/// Whether the last path segment carries a build hash: `client-1f2e3d4c5b6a7988_bg.wasm`.
pub(crate) fn is_hashed_asset(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or_default();
    let Some((stem, _ext)) = file.split_once('.') else {
        return false;
    };
    let stem = stem.strip_suffix("_bg").unwrap_or(stem);
    stem.rsplit_once('-')
        .is_some_and(|(name, hash)| !name.is_empty() && hash.len() >= MIN_HASH_LEN && hash.bytes().all(|b| b.is_ascii_hexdigit()))
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
