//! Signpost Proxy - serves registered SEO pages through a reverse-proxy
//! endpoint.
//!
//! This crate provides the HTTP service that the user's own site forwards
//! path-prefixed requests to. Given a project key and a URL path it resolves
//! the owning project, resolves the page, renders a canonical HTML document,
//! and records a view. It is designed to sit behind a CDN for edge caching.
//!
//! # Architecture
//!
//! - **Resolve**: Two point lookups against the content store, gated on
//!   `active` / `published` status
//! - **Record**: Fire-and-forget page-view writes off the critical path
//! - **Render**: Deterministic HTML documents with SEO metadata via maud
//!   (compile-time templates)
//! - **Cache**: In-process moka cache + Cache-Control headers for CDN caching
//!
//! # URL Pattern
//!
//! ```text
//! GET /{project_key}/{*path}
//! ```
//!
//! The special path `/__verify__` short-circuits with a JSON liveness
//! response used by the setup-verification flow.
//!
//! # Security
//!
//! - The project key is the sole addressing token; domain and prefix are
//!   never trusted from the request
//! - Everything interpolated into the document head is HTML-escaped by maud;
//!   only the author's own page body is injected verbatim
//! - Project and page misses both answer 404, so valid keys cannot be
//!   enumerated

pub mod config;
pub mod error;
pub mod record;
pub mod render;
pub mod resolve;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
