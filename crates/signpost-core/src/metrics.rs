//! Prometheus metrics helpers for the Signpost system.
//!
//! This module provides centralized metrics initialization and common metric
//! definitions used across Signpost components.
//!
//! # Usage
//!
//! ```rust,ignore
//! use signpost_core::metrics::{init_metrics, start_metrics_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize the Prometheus recorder
//!     let handle = init_metrics();
//!
//!     // Start the HTTP server for /metrics endpoint
//!     start_metrics_server(9091, handle).await.unwrap();
//!
//!     // Now use metrics anywhere in your code
//!     use metrics::counter;
//!     counter!("proxy_requests_total").increment(1);
//! }
//! ```
//!
//! # Metric Naming Conventions
//!
//! - Prefix: Component name (e.g., `proxy_`, `store_`)
//! - Suffix: Unit or type (e.g., `_total`, `_seconds`)
//! - Labels: Use sparingly to avoid cardinality explosion

use axum::{Router, routing::get};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;

/// Initialize the Prometheus metrics recorder.
///
/// This must be called once at startup before any metrics are recorded.
/// Returns a handle that can be used with [`start_metrics_server`].
///
/// # Panics
///
/// Panics if called more than once (the recorder can only be installed once).
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    register_common_metrics();

    handle
}

/// Try to initialize the Prometheus metrics recorder.
///
/// Like [`init_metrics`] but returns `None` if the recorder is already
/// installed, instead of panicking. Useful for tests or optional metrics.
pub fn try_init_metrics() -> Option<PrometheusHandle> {
    PrometheusBuilder::new().install_recorder().ok()
}

/// Start the Prometheus metrics HTTP server.
///
/// Serves the `/metrics` endpoint on the specified port.
/// This spawns a background task and returns immediately.
pub async fn start_metrics_server(
    port: u16,
    handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Metrics server listening on http://{}/metrics", addr);

    tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        axum::serve(listener, app).await.unwrap();
    });

    Ok(())
}

/// Register descriptions for common metrics used across Signpost.
///
/// Called automatically by [`init_metrics`].
fn register_common_metrics() {
    // =========================================================================
    // Proxy Endpoint Metrics
    // =========================================================================

    describe_counter!(
        "proxy_requests_total",
        "Total requests handled by the proxy endpoint"
    );
    describe_counter!(
        "proxy_pages_served_total",
        "Requests that resolved to a published page and were served"
    );
    describe_counter!(
        "proxy_not_found_total",
        "Requests that rendered a not-found document (label: kind)"
    );
    describe_counter!(
        "proxy_cache_hits_total",
        "Requests answered from the rendered-document cache"
    );
    describe_counter!(
        "proxy_verify_requests_total",
        "Requests answered by the synthetic __verify__ path"
    );

    // =========================================================================
    // View Recorder Metrics
    // =========================================================================

    describe_counter!(
        "proxy_views_recorded_total",
        "Page views durably recorded in the store"
    );
    describe_counter!(
        "proxy_view_record_failures_total",
        "Page-view writes that failed and were dropped"
    );

    // =========================================================================
    // Resolver / Store Metrics
    // =========================================================================

    describe_counter!(
        "resolve_timeouts_total",
        "Resolver lookups abandoned after the bounded timeout"
    );
    describe_counter!(
        "store_unavailable_total",
        "Resolver lookups that failed because the store was unreachable"
    );
}
