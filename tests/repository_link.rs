//! PostgreSQL repository tests.
//!
//! Each test gets a fresh database with migrations applied. The suite is
//! `#[ignore]`d so `cargo test` passes without PostgreSQL; the handler and
//! service suites cover the same behavior against the in-memory store. Run it
//! with `DATABASE_URL` set and `cargo test -- --ignored`.

use short_links::domain::entities::NewLink;
use short_links::domain::repositories::LinkRepository;
use short_links::error::AppError;
use short_links::infrastructure::persistence::PgLinkRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_link(code: &str, url: &str) -> NewLink {
    NewLink {
        code: code.to_string(),
        long_url: url.to_string(),
    }
}

async fn insert_link(pool: &PgPool, code: &str, url: &str) {
    sqlx::query("INSERT INTO links (code, long_url) VALUES ($1, $2)")
        .bind(code)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo
        .create(new_link("test123", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(link.code, "test123");
    assert_eq!(link.long_url, "https://example.com");
    assert_eq!(link.clicks, 0);
    assert!(link.id > 0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_duplicate_code_conflicts(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.create(new_link("dup123", "https://example.com/a"))
        .await
        .unwrap();
    let err = repo
        .create(new_link("dup123", "https://example.com/b"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_code(pool: PgPool) {
    insert_link(&pool, "abc123", "https://example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.find_by_code("abc123").await.unwrap().unwrap();
    assert_eq!(link.long_url, "https://example.com");

    assert!(repo.find_by_code("missing").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_id(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let created = repo
        .create(new_link("byid01", "https://example.com"))
        .await
        .unwrap();

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found, created);

    assert!(repo.find_by_id(created.id + 1000).await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_exists(pool: PgPool) {
    insert_link(&pool, "here01", "https://example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.exists("here01").await.unwrap());
    assert!(!repo.exists("gone01").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_increment_clicks(pool: PgPool) {
    insert_link(&pool, "clk001", "https://example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    for _ in 0..3 {
        assert!(repo.increment_clicks("clk001").await.unwrap());
    }
    assert!(!repo.increment_clicks("absent").await.unwrap());

    let link = repo.find_by_code("clk001").await.unwrap().unwrap();
    assert_eq!(link.clicks, 3);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_long_url(pool: PgPool) {
    insert_link(&pool, "upd001", "https://example.com/old").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo
        .update_long_url("upd001", "https://example.org/new")
        .await
        .unwrap();
    assert_eq!(link.long_url, "https://example.org/new");

    let err = repo
        .update_long_url("absent", "https://example.org")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_recent_newest_first(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    for i in 0..3 {
        repo.create(new_link(&format!("lst00{i}"), "https://example.com"))
            .await
            .unwrap();
    }

    let links = repo.list_recent(2).await.unwrap();

    assert_eq!(links.len(), 2);
    assert_eq!(links[0].code, "lst002");
    assert_eq!(links[1].code, "lst001");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_ping(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
