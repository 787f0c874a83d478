//! Resolution of a project key + request path to servable content.
//!
//! Two sequential point lookups against the content store: the active
//! project by its opaque key, then the published page by `(project_id,
//! path)`. The second lookup needs the first's result, so there is no
//! parallelization opportunity. Resolution is a pure read.

use std::time::Duration;

use tokio::time::timeout;

use signpost_core::{Page, Project};
use signpost_store::{ContentStore, StoreResult};

use crate::error::ProxyError;

/// The resolved result of a proxy lookup: an active project and one of its
/// published pages.
#[derive(Debug)]
pub struct ResolvedPage {
    pub project: Project,
    pub page: Page,
}

/// Resolve `project_key` + `path` against the store.
///
/// `project_key` is opaque: equality lookup only, no structural validation.
/// `path` must already be normalized to a leading-slash string.
///
/// Each lookup runs under `lookup_timeout`. Store failures and timeouts are
/// logged (distinguishable from a genuine absence) but fail closed as the
/// corresponding not-found outcome — content whose status the store cannot
/// confirm is never served, and nothing is retried mid-request.
pub async fn resolve(
    store: &dyn ContentStore,
    lookup_timeout: Duration,
    project_key: &str,
    path: &str,
) -> Result<ResolvedPage, ProxyError> {
    let project = match bounded(lookup_timeout, store.find_active_project(project_key)).await {
        Lookup::Found(project) => project,
        Lookup::Absent => {
            metrics::counter!("proxy_not_found_total", "kind" => "project").increment(1);
            return Err(ProxyError::ProjectNotFound);
        }
        Lookup::Failed => return Err(ProxyError::ProjectNotFound),
    };

    let page = match bounded(
        lookup_timeout,
        store.find_published_page(project.id, path),
    )
    .await
    {
        Lookup::Found(page) => page,
        Lookup::Absent => {
            metrics::counter!("proxy_not_found_total", "kind" => "page").increment(1);
            return Err(ProxyError::PageNotFound);
        }
        Lookup::Failed => return Err(ProxyError::PageNotFound),
    };

    Ok(ResolvedPage { project, page })
}

enum Lookup<T> {
    Found(T),
    Absent,
    Failed,
}

/// Run one store lookup under the timeout, flattening the outcome.
async fn bounded<T, F>(lookup_timeout: Duration, future: F) -> Lookup<T>
where
    F: Future<Output = StoreResult<Option<T>>>,
{
    match timeout(lookup_timeout, future).await {
        Ok(Ok(Some(value))) => Lookup::Found(value),
        Ok(Ok(None)) => Lookup::Absent,
        Ok(Err(err)) => {
            metrics::counter!("store_unavailable_total").increment(1);
            tracing::error!(error = %err, "store lookup failed, failing closed");
            Lookup::Failed
        }
        Err(_) => {
            metrics::counter!("resolve_timeouts_total").increment(1);
            tracing::warn!(timeout_ms = lookup_timeout.as_millis(), "store lookup timed out");
            Lookup::Failed
        }
    }
}
