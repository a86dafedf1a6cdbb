//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A short link with its usage counter.
///
/// `code` is unique across all links and never changes after creation.
/// `clicks` starts at zero and is only ever incremented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        long_url: String,
        created_at: DateTime<Utc>,
        clicks: i64,
    ) -> Self {
        Self {
            id,
            code,
            long_url,
            created_at,
            clicks,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            now,
            0,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.code, "abc123");
        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.created_at, now);
        assert_eq!(link.clicks, 0);
    }

    #[test]
    fn test_link_serializes_public_fields() {
        let link = Link::new(
            7,
            "Zx_9-a".to_string(),
            "https://rust-lang.org".to_string(),
            Utc::now(),
            3,
        );

        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["code"], "Zx_9-a");
        assert_eq!(json["long_url"], "https://rust-lang.org");
        assert_eq!(json["clicks"], 3);
        assert!(json["created_at"].is_string());
    }
}
