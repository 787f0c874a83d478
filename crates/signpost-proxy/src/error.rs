//! Error types for the proxy service.
//!
//! Failed resolutions are rendered as HTML error documents rather than bare
//! status codes, so visitors of the proxied domain still see a native-looking
//! page. Both outcomes are 404s: the response never reveals whether a given
//! project key exists.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::render;

/// Proxy request error type.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProxyError {
    /// No active project matches the key. Also covers store failures during
    /// the project lookup (fail closed: never serve unconfirmed content).
    #[error("project not found")]
    ProjectNotFound,

    /// The project resolved, but no published page matches the path. Also
    /// covers store failures during the page lookup.
    #[error("page not found")]
    PageNotFound,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (title, message) = match self {
            Self::ProjectNotFound => (
                "Project Not Found",
                "This project does not exist or is not active.",
            ),
            Self::PageNotFound => ("Page Not Found", "The requested page does not exist."),
        };

        let markup = render::error_document(title, message);
        (StatusCode::NOT_FOUND, markup).into_response()
    }
}
