//! Route definitions for the proxy service.
//!
//! ## Routes
//!
//! - `GET /health` - Health check (JSON)
//! - `GET /verify?url=...` - Setup-verification fetch (JSON)
//! - `GET /{project_key}` - Proxy entry, project root path
//! - `GET /{project_key}/{*path}` - Proxy entry, page path

mod health;
mod proxy;
mod verify;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

/// Build the complete proxy service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/verify", get(verify::verify_setup))
        .route("/{project_key}", get(proxy::serve_project_root))
        .route("/{project_key}/{*path}", get(proxy::serve_project_path))
        .with_state(state)
}
