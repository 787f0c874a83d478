//! In-memory content store for tests and local development.
//!
//! Enforces the same contract as the Postgres store: unique `(user, domain)`
//! and `(project, path)` pairs, status gates on lookups, cascade deletes,
//! and an increment that cannot lose counts under concurrent recorders.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use signpost_core::{
    NewPage, NewPageView, NewProject, Page, PageStatus, PageView, Project, ProjectStatus,
    generate_project_key, normalize_path, validate_domain, validate_path_prefix,
};

use crate::error::{StoreError, StoreResult};
use crate::ContentStore;

#[derive(Default)]
struct Inner {
    projects: HashMap<Uuid, Project>,
    pages: HashMap<Uuid, Page>,
    views: Vec<PageView>,
}

/// In-process content store backed by hash maps.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("memory store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("memory store lock poisoned")
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn find_active_project(&self, project_key: &str) -> StoreResult<Option<Project>> {
        let inner = self.read();
        Ok(inner
            .projects
            .values()
            .find(|p| p.project_key == project_key && p.status == ProjectStatus::Active)
            .cloned())
    }

    async fn find_published_page(
        &self,
        project_id: Uuid,
        path: &str,
    ) -> StoreResult<Option<Page>> {
        let inner = self.read();
        Ok(inner
            .pages
            .values()
            .find(|p| {
                p.project_id == project_id && p.path == path && p.status == PageStatus::Published
            })
            .cloned())
    }

    async fn insert_page_view(&self, view: NewPageView) -> StoreResult<()> {
        let mut inner = self.write();
        if !inner.pages.contains_key(&view.page_id) {
            return Err(StoreError::NotFound);
        }
        inner.views.push(PageView {
            id: Uuid::new_v4(),
            page_id: view.page_id,
            viewed_at: Utc::now(),
            referer: view.referer,
            user_agent: view.user_agent,
        });
        Ok(())
    }

    async fn increment_view_count(&self, page_id: Uuid) -> StoreResult<()> {
        let mut inner = self.write();
        let page = inner.pages.get_mut(&page_id).ok_or(StoreError::NotFound)?;
        page.view_count += 1;
        Ok(())
    }

    async fn create_project(&self, new: NewProject) -> StoreResult<Project> {
        let domain = validate_domain(&new.domain)?;
        let path_prefix = validate_path_prefix(&new.path_prefix)?;

        let mut inner = self.write();
        if inner
            .projects
            .values()
            .any(|p| p.user_id == new.user_id && p.domain == domain)
        {
            return Err(StoreError::DuplicateDomain);
        }

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            domain,
            path_prefix,
            project_key: generate_project_key(),
            status: ProjectStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        inner.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn set_project_status(&self, id: Uuid, status: ProjectStatus) -> StoreResult<()> {
        let mut inner = self.write();
        let project = inner.projects.get_mut(&id).ok_or(StoreError::NotFound)?;
        project.status = status;
        project.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.write();
        if inner.projects.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        let orphaned: Vec<Uuid> = inner
            .pages
            .values()
            .filter(|p| p.project_id == id)
            .map(|p| p.id)
            .collect();
        for page_id in &orphaned {
            inner.pages.remove(page_id);
        }
        inner.views.retain(|v| !orphaned.contains(&v.page_id));
        Ok(())
    }

    async fn create_page(&self, new: NewPage) -> StoreResult<Page> {
        let path = normalize_path(&new.path);

        let mut inner = self.write();
        if !inner.projects.contains_key(&new.project_id) {
            return Err(StoreError::NotFound);
        }
        if inner
            .pages
            .values()
            .any(|p| p.project_id == new.project_id && p.path == path)
        {
            return Err(StoreError::DuplicatePath);
        }

        let now = Utc::now();
        let page = Page {
            id: Uuid::new_v4(),
            project_id: new.project_id,
            path,
            title: new.title,
            content: new.content,
            meta_description: new.meta_description,
            meta_keywords: new.meta_keywords,
            status: PageStatus::Draft,
            view_count: 0,
            created_at: now,
            updated_at: now,
        };
        inner.pages.insert(page.id, page.clone());
        Ok(page)
    }

    async fn set_page_status(&self, id: Uuid, status: PageStatus) -> StoreResult<()> {
        let mut inner = self.write();
        let page = inner.pages.get_mut(&id).ok_or(StoreError::NotFound)?;
        page.status = status;
        page.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_page(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.write();
        if inner.pages.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        inner.views.retain(|v| v.page_id != id);
        Ok(())
    }

    async fn get_page(&self, id: Uuid) -> StoreResult<Option<Page>> {
        let inner = self.read();
        Ok(inner.pages.get(&id).cloned())
    }

    async fn count_page_views(&self, page_id: Uuid) -> StoreResult<u64> {
        let inner = self.read();
        Ok(inner.views.iter().filter(|v| v.page_id == page_id).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn project_with_page(store: &MemoryStore) -> (Project, Page) {
        let project = store
            .create_project(NewProject {
                user_id: Uuid::new_v4(),
                domain: "example.com".to_string(),
                path_prefix: "/seo".to_string(),
            })
            .await
            .unwrap();
        let page = store
            .create_page(NewPage {
                project_id: project.id,
                path: "/intro".to_string(),
                title: "Intro".to_string(),
                content: "<p>Hi</p>".to_string(),
                meta_description: String::new(),
                meta_keywords: String::new(),
            })
            .await
            .unwrap();
        (project, page)
    }

    #[tokio::test]
    async fn create_project_starts_pending_with_generated_key() {
        let store = MemoryStore::new();
        let project = store
            .create_project(NewProject {
                user_id: Uuid::new_v4(),
                domain: "Example.COM".to_string(),
                path_prefix: "/seo/".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(project.status, ProjectStatus::Pending);
        assert_eq!(project.domain, "example.com");
        assert_eq!(project.path_prefix, "/seo");
        assert!(project.project_key.starts_with("pk_"));
    }

    #[tokio::test]
    async fn duplicate_domain_same_user_rejected() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let new = NewProject {
            user_id,
            domain: "example.com".to_string(),
            path_prefix: "/seo".to_string(),
        };
        store.create_project(new.clone()).await.unwrap();

        let err = store.create_project(new).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateDomain));
    }

    #[tokio::test]
    async fn same_domain_different_user_allowed() {
        let store = MemoryStore::new();
        for _ in 0..2 {
            store
                .create_project(NewProject {
                    user_id: Uuid::new_v4(),
                    domain: "example.com".to_string(),
                    path_prefix: "/seo".to_string(),
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn invalid_domain_rejected() {
        let store = MemoryStore::new();
        let err = store
            .create_project(NewProject {
                user_id: Uuid::new_v4(),
                domain: "not a domain".to_string(),
                path_prefix: "/seo".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[tokio::test]
    async fn pending_project_does_not_resolve() {
        let store = MemoryStore::new();
        let (project, _) = project_with_page(&store).await;

        let found = store.find_active_project(&project.project_key).await.unwrap();
        assert!(found.is_none());

        store
            .set_project_status(project.id, ProjectStatus::Active)
            .await
            .unwrap();
        let found = store.find_active_project(&project.project_key).await.unwrap();
        assert_eq!(found.unwrap().id, project.id);
    }

    #[tokio::test]
    async fn inactive_project_stops_resolving() {
        let store = MemoryStore::new();
        let (project, _) = project_with_page(&store).await;
        store
            .set_project_status(project.id, ProjectStatus::Active)
            .await
            .unwrap();
        store
            .set_project_status(project.id, ProjectStatus::Inactive)
            .await
            .unwrap();

        assert!(
            store
                .find_active_project(&project.project_key)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn create_page_starts_draft_and_normalizes_path() {
        let store = MemoryStore::new();
        let (project, _) = project_with_page(&store).await;
        let page = store
            .create_page(NewPage {
                project_id: project.id,
                path: "pricing".to_string(),
                title: "Pricing".to_string(),
                content: String::new(),
                meta_description: String::new(),
                meta_keywords: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(page.status, PageStatus::Draft);
        assert_eq!(page.path, "/pricing");
        assert_eq!(page.view_count, 0);
    }

    #[tokio::test]
    async fn duplicate_path_in_project_rejected() {
        let store = MemoryStore::new();
        let (project, _) = project_with_page(&store).await;
        let err = store
            .create_page(NewPage {
                project_id: project.id,
                path: "/intro".to_string(),
                title: "Other".to_string(),
                content: String::new(),
                meta_description: String::new(),
                meta_keywords: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicatePath));
    }

    #[tokio::test]
    async fn page_for_unknown_project_rejected() {
        let store = MemoryStore::new();
        let err = store
            .create_page(NewPage {
                project_id: Uuid::new_v4(),
                path: "/intro".to_string(),
                title: "Intro".to_string(),
                content: String::new(),
                meta_description: String::new(),
                meta_keywords: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn only_published_pages_resolve() {
        let store = MemoryStore::new();
        let (project, page) = project_with_page(&store).await;

        // draft
        assert!(
            store
                .find_published_page(project.id, "/intro")
                .await
                .unwrap()
                .is_none()
        );

        store
            .set_page_status(page.id, PageStatus::Published)
            .await
            .unwrap();
        assert!(
            store
                .find_published_page(project.id, "/intro")
                .await
                .unwrap()
                .is_some()
        );

        store
            .set_page_status(page.id, PageStatus::Offline)
            .await
            .unwrap();
        assert!(
            store
                .find_published_page(project.id, "/intro")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn views_and_counter_converge() {
        let store = MemoryStore::new();
        let (_, page) = project_with_page(&store).await;

        for _ in 0..5 {
            store
                .insert_page_view(NewPageView {
                    page_id: page.id,
                    referer: Some("https://www.google.com/".to_string()),
                    user_agent: None,
                })
                .await
                .unwrap();
            store.increment_view_count(page.id).await.unwrap();
        }

        assert_eq!(store.count_page_views(page.id).await.unwrap(), 5);
        assert_eq!(store.get_page(page.id).await.unwrap().unwrap().view_count, 5);
    }

    #[tokio::test]
    async fn concurrent_increments_lose_nothing() {
        let store = Arc::new(MemoryStore::new());
        let (_, page) = project_with_page(&store).await;

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = Arc::clone(&store);
            let page_id = page.id;
            handles.push(tokio::spawn(async move {
                store.increment_view_count(page_id).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(
            store.get_page(page.id).await.unwrap().unwrap().view_count,
            50
        );
    }

    #[tokio::test]
    async fn view_for_unknown_page_rejected() {
        let store = MemoryStore::new();
        let err = store
            .insert_page_view(NewPageView {
                page_id: Uuid::new_v4(),
                referer: None,
                user_agent: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn delete_project_cascades_to_pages_and_views() {
        let store = MemoryStore::new();
        let (project, page) = project_with_page(&store).await;
        store
            .insert_page_view(NewPageView {
                page_id: page.id,
                referer: None,
                user_agent: None,
            })
            .await
            .unwrap();

        store.delete_project(project.id).await.unwrap();

        assert!(store.get_page(page.id).await.unwrap().is_none());
        assert_eq!(store.count_page_views(page.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_page_cascades_to_views() {
        let store = MemoryStore::new();
        let (_, page) = project_with_page(&store).await;
        store
            .insert_page_view(NewPageView {
                page_id: page.id,
                referer: None,
                user_agent: None,
            })
            .await
            .unwrap();

        store.delete_page(page.id).await.unwrap();
        assert_eq!(store.count_page_views(page.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_missing_rows_reported() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.delete_project(Uuid::new_v4()).await.unwrap_err(),
            StoreError::NotFound
        ));
        assert!(matches!(
            store.delete_page(Uuid::new_v4()).await.unwrap_err(),
            StoreError::NotFound
        ));
    }
}
