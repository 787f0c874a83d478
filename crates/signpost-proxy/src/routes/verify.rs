//! Setup-verification endpoint: `GET /verify?url=...`.
//!
//! The setup wizard asks this endpoint to fetch the user's own site at the
//! proxied `__verify__` URL. A `{success, projectKey}` JSON body there
//! proves the user's rewrite rule forwards requests to the proxy. Failures
//! are reported in the response body, not as error statuses, so the wizard
//! can show them verbatim.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::state::AppState;

/// User-Agent sent on verification fetches.
const VERIFY_USER_AGENT: &str = "signpost-verification/1.0";

/// Query parameters for the verification endpoint.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    url: Option<String>,
}

/// Fetch the target URL and re-emit its verification outcome.
pub async fn verify_setup(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    let Some(url) = params.url else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "URL is required" })))
            .into_response();
    };

    match fetch_verification(&state.http, &url).await {
        Ok(project_key) => Json(json!({
            "success": true,
            "projectKey": project_key,
        }))
        .into_response(),
        Err(error) => {
            tracing::debug!(url = %url, error = %error, "setup verification failed");
            Json(json!({
                "success": false,
                "error": error,
            }))
            .into_response()
        }
    }
}

/// Fetch `url` and extract the echoed project key from a
/// `{success: true, projectKey}` JSON body.
async fn fetch_verification(client: &reqwest::Client, url: &str) -> Result<String, String> {
    let response = client
        .get(url)
        .header(header::USER_AGENT, VERIFY_USER_AGENT)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("error")
        ));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|_| "Invalid verification response".to_string())?;

    match (
        body.get("success").and_then(Value::as_bool),
        body.get("projectKey").and_then(Value::as_str),
    ) {
        (Some(true), Some(key)) => Ok(key.to_string()),
        _ => Err("Invalid verification response".to_string()),
    }
}
