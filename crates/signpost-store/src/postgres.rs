//! Postgres-backed content store.
//!
//! All lookups are point lookups on unique-constrained columns. Uniqueness
//! and cascade deletes are enforced by the schema (see `migrations/`), and
//! the view counter is bumped with an atomic SQL increment rather than a
//! read-then-write cycle, so concurrent hits on the same page cannot lose
//! counts.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use signpost_core::{
    NewPage, NewPageView, NewProject, Page, PageStatus, Project, ProjectStatus,
    generate_project_key, normalize_path, validate_domain, validate_path_prefix,
};

use crate::error::{StoreError, StoreResult};
use crate::ContentStore;

/// Postgres content store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to Postgres and build the connection pool.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await?;

        tracing::info!("connected to Postgres content store");

        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by tests that manage their own pool).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run pending schema migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("schema migrations applied");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// A row from the `projects` table. Status is stored as text and parsed on
/// the way out.
#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    user_id: Uuid,
    domain: String,
    path_prefix: String,
    project_key: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> StoreResult<Self> {
        Ok(Project {
            id: row.id,
            user_id: row.user_id,
            domain: row.domain,
            path_prefix: row.path_prefix,
            project_key: row.project_key,
            status: ProjectStatus::from_str(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row from the `pages` table.
#[derive(Debug, sqlx::FromRow)]
struct PageRow {
    id: Uuid,
    project_id: Uuid,
    path: String,
    title: String,
    content: String,
    meta_description: String,
    meta_keywords: String,
    status: String,
    view_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PageRow> for Page {
    type Error = StoreError;

    fn try_from(row: PageRow) -> StoreResult<Self> {
        Ok(Page {
            id: row.id,
            project_id: row.project_id,
            path: row.path,
            title: row.title,
            content: row.content,
            meta_description: row.meta_description,
            meta_keywords: row.meta_keywords,
            status: PageStatus::from_str(&row.status)?,
            view_count: row.view_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PROJECT_COLUMNS: &str =
    "id, user_id, domain, path_prefix, project_key, status, created_at, updated_at";

const PAGE_COLUMNS: &str = "id, project_id, path, title, content, meta_description, \
     meta_keywords, status, view_count, created_at, updated_at";

/// Map a unique-constraint name to the typed conflict error, if it is one of
/// the constraints the contract promises to surface.
fn unique_violation_to_conflict(constraint: Option<&str>) -> Option<StoreError> {
    match constraint {
        Some("projects_user_id_domain_key") => Some(StoreError::DuplicateDomain),
        Some("pages_project_id_path_key") => Some(StoreError::DuplicatePath),
        _ => None,
    }
}

/// Convert an insert error, surfacing known unique violations as conflicts.
fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
        && let Some(conflict) = unique_violation_to_conflict(db_err.constraint())
    {
        return conflict;
    }
    StoreError::Unavailable(err)
}

#[async_trait]
impl ContentStore for PgStore {
    async fn find_active_project(&self, project_key: &str) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             WHERE project_key = $1 AND status = 'active'"
        ))
        .bind(project_key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Project::try_from).transpose()
    }

    async fn find_published_page(
        &self,
        project_id: Uuid,
        path: &str,
    ) -> StoreResult<Option<Page>> {
        let row = sqlx::query_as::<_, PageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages \
             WHERE project_id = $1 AND path = $2 AND status = 'published'"
        ))
        .bind(project_id)
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Page::try_from).transpose()
    }

    async fn insert_page_view(&self, view: NewPageView) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO page_views (id, page_id, referer, user_agent) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(view.page_id)
        .bind(view.referer)
        .bind(view.user_agent)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn increment_view_count(&self, page_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("UPDATE pages SET view_count = view_count + 1 WHERE id = $1")
            .bind(page_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn create_project(&self, new: NewProject) -> StoreResult<Project> {
        let domain = validate_domain(&new.domain)?;
        let path_prefix = validate_path_prefix(&new.path_prefix)?;
        let project_key = generate_project_key();

        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "INSERT INTO projects (id, user_id, domain, path_prefix, project_key) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(&domain)
        .bind(&path_prefix)
        .bind(&project_key)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        row.try_into()
    }

    async fn set_project_status(&self, id: Uuid, status: ProjectStatus) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE projects SET status = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(status.as_str())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn create_page(&self, new: NewPage) -> StoreResult<Page> {
        let path = normalize_path(&new.path);

        let row = sqlx::query_as::<_, PageRow>(&format!(
            "INSERT INTO pages \
             (id, project_id, path, title, content, meta_description, meta_keywords) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PAGE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new.project_id)
        .bind(&path)
        .bind(&new.title)
        .bind(&new.content)
        .bind(&new.meta_description)
        .bind(&new.meta_keywords)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        row.try_into()
    }

    async fn set_page_status(&self, id: Uuid, status: PageStatus) -> StoreResult<()> {
        let result = sqlx::query("UPDATE pages SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_page(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get_page(&self, id: Uuid) -> StoreResult<Option<Page>> {
        let row =
            sqlx::query_as::<_, PageRow>(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Page::try_from).transpose()
    }

    async fn count_page_views(&self, page_id: Uuid) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM page_views WHERE page_id = $1")
            .bind(page_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }
}
