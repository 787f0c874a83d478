//! Fire-and-forget recording of page views.
//!
//! Recording is off the hit's critical path: the handler dispatches the
//! write and responds without waiting. A dropped view degrades analytics but
//! must never fail or delay the content response.

use std::sync::Arc;

use tokio::task::JoinHandle;
use uuid::Uuid;

use signpost_core::NewPageView;
use signpost_store::{ContentStore, StoreResult};

/// Records page views against the content store from detached tasks.
#[derive(Clone)]
pub struct ViewRecorder {
    store: Arc<dyn ContentStore>,
}

impl ViewRecorder {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Record one view of `page_id`: append a PageView row, then atomically
    /// bump the page's denormalized counter.
    ///
    /// The write runs on a detached task, so cancelling the request does not
    /// cancel it, and its failure is captured only as a warning and a
    /// counter — never surfaced to the response, never retried. The returned
    /// handle exists for tests that want to await convergence; the request
    /// path drops it.
    pub fn record(
        &self,
        page_id: Uuid,
        referer: Option<String>,
        user_agent: Option<String>,
    ) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            match write(store.as_ref(), page_id, referer, user_agent).await {
                Ok(()) => {
                    metrics::counter!("proxy_views_recorded_total").increment(1);
                }
                Err(err) => {
                    metrics::counter!("proxy_view_record_failures_total").increment(1);
                    tracing::warn!(page_id = %page_id, error = %err, "failed to record page view");
                }
            }
        })
    }
}

/// The two store writes behind one view. Deliberately not a transaction:
/// the counter is eventually consistent with the view rows, and coupling
/// page serving to write durability is exactly what this module avoids.
async fn write(
    store: &dyn ContentStore,
    page_id: Uuid,
    referer: Option<String>,
    user_agent: Option<String>,
) -> StoreResult<()> {
    store
        .insert_page_view(NewPageView {
            page_id,
            referer,
            user_agent,
        })
        .await?;
    store.increment_view_count(page_id).await?;
    Ok(())
}
