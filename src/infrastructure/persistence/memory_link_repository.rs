//! In-process link repository.
//!
//! Keeps every link in a map behind an async `RwLock`. The duplicate check and
//! the insert happen under one write guard, which gives `create` the same
//! atomic uniqueness guarantee as the PostgreSQL constraint. Data does not
//! survive a restart.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    by_code: HashMap<String, Link>,
}

/// Link repository held entirely in memory.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    inner: RwLock<Inner>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_code.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut inner = self.inner.write().await;

        if inner.by_code.contains_key(&new_link.code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_code_key" }),
            ));
        }

        inner.next_id += 1;
        let link = Link::new(
            inner.next_id,
            new_link.code,
            new_link.long_url,
            Utc::now(),
            0,
        );
        inner.by_code.insert(link.code.clone(), link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.inner.read().await.by_code.get(code).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self
            .inner
            .read()
            .await
            .by_code
            .values()
            .find(|link| link.id == id)
            .cloned())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        let inner = self.inner.read().await;
        let mut links: Vec<Link> = inner.by_code.values().cloned().collect();
        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        links.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(links)
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.inner.read().await.by_code.contains_key(code))
    }

    async fn increment_clicks(&self, code: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        match inner.by_code.get_mut(code) {
            Some(link) => {
                link.clicks += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_long_url(&self, code: &str, long_url: &str) -> Result<Link, AppError> {
        let mut inner = self.inner.write().await;
        let link = inner
            .by_code
            .get_mut(code)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        link.long_url = long_url.to_string();
        Ok(link.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_link(code: &str, url: &str) -> NewLink {
        NewLink {
            code: code.to_string(),
            long_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryLinkRepository::new();

        let link = repo
            .create(new_link("abc123", "https://example.com"))
            .await
            .unwrap();

        assert_eq!(link.id, 1);
        assert_eq!(link.clicks, 0);
        assert_eq!(repo.find_by_code("abc123").await.unwrap(), Some(link.clone()));
        assert_eq!(repo.find_by_id(1).await.unwrap(), Some(link));
        assert!(repo.exists("abc123").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let repo = InMemoryLinkRepository::new();
        repo.create(new_link("dup001", "https://a.example"))
            .await
            .unwrap();

        let result = repo.create(new_link("dup001", "https://b.example")).await;

        assert!(result.unwrap_err().is_conflict());
        assert_eq!(repo.len().await, 1);
        assert_eq!(
            repo.find_by_code("dup001").await.unwrap().unwrap().long_url,
            "https://a.example"
        );
    }

    #[tokio::test]
    async fn test_increment_unknown_code_is_noop() {
        let repo = InMemoryLinkRepository::new();
        assert!(!repo.increment_clicks("missing").await.unwrap());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_recent_orders_newest_first() {
        let repo = InMemoryLinkRepository::new();
        for code in ["first1", "second", "third3"] {
            repo.create(new_link(code, "https://example.com"))
                .await
                .unwrap();
        }

        let links = repo.list_recent(2).await.unwrap();

        let codes: Vec<&str> = links.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["third3", "second"]);
    }

    #[tokio::test]
    async fn test_update_missing_link() {
        let repo = InMemoryLinkRepository::new();
        let result = repo.update_long_url("nope", "https://example.com").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
