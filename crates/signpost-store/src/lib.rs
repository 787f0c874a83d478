//! The Signpost content store.
//!
//! Persists [`Project`], [`Page`], and page-view entities and enforces the
//! uniqueness constraints the proxy depends on: one project per owning user
//! per domain, one page per project per path, and a globally unique project
//! key. The proxy consumes the store through the [`ContentStore`] trait as an
//! explicitly constructed handle — never ambient global state.
//!
//! Two implementations:
//! - [`PgStore`]: Postgres via sqlx; constraints and cascades live in the
//!   schema, the view counter uses an atomic SQL increment.
//! - [`MemoryStore`]: in-process store for tests and local development,
//!   enforcing the same contract.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use signpost_core::{NewPage, NewPageView, NewProject, Page, PageStatus, Project, ProjectStatus};

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence operations for projects, pages, and page views.
///
/// Lookup methods are point lookups on unique-constrained columns; `None`
/// means "absent or gated by status", never an error. Mutations surface
/// uniqueness conflicts as typed [`StoreError`] variants.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Look up a project by key, returning it only when `status = active`.
    async fn find_active_project(&self, project_key: &str) -> StoreResult<Option<Project>>;

    /// Look up a page by `(project_id, path)`, returning it only when
    /// `status = published`.
    async fn find_published_page(&self, project_id: Uuid, path: &str)
    -> StoreResult<Option<Page>>;

    /// Append one page-view row. Page views are never updated or deleted
    /// except by cascade when their page goes away.
    async fn insert_page_view(&self, view: NewPageView) -> StoreResult<()>;

    /// Atomically add one to the page's denormalized view counter.
    async fn increment_view_count(&self, page_id: Uuid) -> StoreResult<()>;

    /// Create a project in `pending` status with a freshly generated key.
    /// The domain is validated and lowercased; a duplicate `(user, domain)`
    /// pair is [`StoreError::DuplicateDomain`].
    async fn create_project(&self, new: NewProject) -> StoreResult<Project>;

    /// Transition a project's status (e.g., `pending` -> `active` after
    /// external verification succeeds).
    async fn set_project_status(&self, id: Uuid, status: ProjectStatus) -> StoreResult<()>;

    /// Delete a project, cascading to its pages and their views.
    async fn delete_project(&self, id: Uuid) -> StoreResult<()>;

    /// Create a page in `draft` status under a project. The path is
    /// normalized; a duplicate `(project, path)` pair is
    /// [`StoreError::DuplicatePath`].
    async fn create_page(&self, new: NewPage) -> StoreResult<Page>;

    /// Transition a page's status at author discretion.
    async fn set_page_status(&self, id: Uuid, status: PageStatus) -> StoreResult<()>;

    /// Delete a page, cascading to its views.
    async fn delete_page(&self, id: Uuid) -> StoreResult<()>;

    /// Fetch a page by id regardless of status.
    async fn get_page(&self, id: Uuid) -> StoreResult<Option<Page>>;

    /// Count page-view rows for a page. Used by tests and by view-count
    /// reconciliation.
    async fn count_page_views(&self, page_id: Uuid) -> StoreResult<u64>;
}
