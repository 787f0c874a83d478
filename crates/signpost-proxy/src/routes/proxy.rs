//! The public proxy entry: `GET /{project_key}/{*path}`.
//!
//! The user's own site rewrites path-prefixed requests to this endpoint.
//! Per request:
//!
//! 1. `/__verify__` short-circuits with a synthetic JSON liveness response
//!    before any store access.
//! 2. Otherwise the key + path resolve to an active project and a published
//!    page, a view is recorded fire-and-forget, and the rendered document is
//!    returned with short cache headers.
//! 3. Failed resolutions render a 404 error document.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};

use signpost_core::normalize_path;

use crate::error::ProxyError;
use crate::render;
use crate::resolve;
use crate::state::{AppState, CachedPage};

/// Synthetic always-available liveness path used by setup verification.
/// Must short-circuit before any store lookup and echo the key from the URL,
/// proving only that the proxy wiring reaches this endpoint.
const VERIFY_PATH: &str = "/__verify__";

/// Browser cache TTL for successful page responses, in seconds.
const BROWSER_TTL_SECS: u32 = 60;

/// Shared/CDN cache TTL for successful page responses, in seconds.
const EDGE_TTL_SECS: u32 = 300;

/// Handle `GET /{project_key}` — the project's root path.
pub async fn serve_project_root(
    State(state): State<AppState>,
    Path(project_key): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ProxyError> {
    serve(&state, &project_key, "", &headers).await
}

/// Handle `GET /{project_key}/{*path}`.
pub async fn serve_project_path(
    State(state): State<AppState>,
    Path((project_key, path)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ProxyError> {
    serve(&state, &project_key, &path, &headers).await
}

/// Serve one proxy request.
async fn serve(
    state: &AppState,
    project_key: &str,
    raw_path: &str,
    headers: &HeaderMap,
) -> Result<Response, ProxyError> {
    let project_key = project_key.trim();
    let path = normalize_path(raw_path);

    metrics::counter!("proxy_requests_total").increment(1);

    if path == VERIFY_PATH {
        metrics::counter!("proxy_verify_requests_total").increment(1);
        return Ok(verify_response(project_key));
    }

    let referer = header_string(headers, header::REFERER);
    let user_agent = header_string(headers, header::USER_AGENT);

    // A request that reaches the proxy is a hit whether or not the rendered
    // document is cached; only the resolve + render work is skipped.
    let cache_key = format!("{project_key}\n{path}");
    if let Some(cached) = state.cache.get(&cache_key).await {
        metrics::counter!("proxy_cache_hits_total").increment(1);
        tracing::debug!(key = %project_key, path = %path, "document cache hit");
        let _ = state.recorder.record(cached.page_id, referer, user_agent);
        return Ok(page_response(&cached.html));
    }

    let resolved = resolve::resolve(
        state.store.as_ref(),
        state.config.resolve_timeout,
        project_key,
        &path,
    )
    .await?;

    let _ = state
        .recorder
        .record(resolved.page.id, referer, user_agent);

    let canonical = render::canonical_url(
        &resolved.project.domain,
        &resolved.project.path_prefix,
        &resolved.page.path,
    );
    let html = render::page_document(&resolved.page, &canonical).into_string();

    state
        .cache
        .insert(
            cache_key,
            CachedPage {
                html: html.clone(),
                page_id: resolved.page.id,
            },
        )
        .await;

    metrics::counter!("proxy_pages_served_total").increment(1);
    Ok(page_response(&html))
}

/// Build the 200 HTML response with content-type and cache headers.
fn page_response(html: &str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    let cache_value = format!("public, max-age={BROWSER_TTL_SECS}, s-maxage={EDGE_TTL_SECS}");
    if let Ok(val) = HeaderValue::from_str(&cache_value) {
        headers.insert(header::CACHE_CONTROL, val);
    }

    (StatusCode::OK, headers, html.to_string()).into_response()
}

/// Build the synthetic `__verify__` JSON response, echoing the key taken
/// from the URL, not from any stored record.
fn verify_response(project_key: &str) -> Response {
    axum::Json(serde_json::json!({
        "success": true,
        "projectKey": project_key,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
    .into_response()
}

/// Extract a header as an owned string, if present and valid UTF-8.
fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
