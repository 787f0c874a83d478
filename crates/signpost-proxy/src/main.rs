//! Signpost Proxy - HTTP server for proxied SEO pages.
//!
//! Resolves project key + path requests against the content store and
//! serves rendered HTML documents, designed to be placed behind a CDN.

use std::sync::Arc;

use axum::http::Request;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use signpost_core::metrics::{init_metrics, start_metrics_server};
use signpost_proxy::{AppState, Config, router};
use signpost_store::PgStore;

/// Signpost Proxy - serves registered SEO pages through the proxy endpoint.
#[derive(Parser, Debug)]
#[command(name = "signpost-proxy")]
#[command(about = "Reverse-proxy server for Signpost SEO pages", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load .env file if it exists
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();

    // Start the Prometheus exporter when configured
    if let Some(port) = config.metrics_port {
        let handle = init_metrics();
        start_metrics_server(port, handle).await?;
    }

    // Connect to the content store and apply migrations
    let store = PgStore::connect(&config.database_url).await?;
    store.migrate().await?;
    tracing::info!("content store ready");

    // Create application state
    let state = AppState::new(config, Arc::new(store));

    // Build router with middleware
    let app = router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting proxy server");

    axum::serve(listener, app).await?;

    Ok(())
}
