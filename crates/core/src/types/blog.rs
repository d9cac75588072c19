//! Blog article types.
//!
//! The blog is read-only from the client's point of view: articles are
//! produced by an external pipeline and this client only lists and renders
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::BlogPostId;

/// A published article as returned by the blog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPostSummary {
    /// Unique post ID.
    pub id: BlogPostId,
    /// Article title.
    pub title: String,
    /// URL slug, used to fetch the full post.
    pub slug: String,
    /// Short teaser shown in listings.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Category the post is filed under.
    #[serde(default)]
    pub category: Option<String>,
    /// When the post was published.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// A full article, fetched by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Unique post ID.
    pub id: BlogPostId,
    /// Article title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Full article body (markdown).
    pub content: String,
    /// Short teaser.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Category the post is filed under.
    #[serde(default)]
    pub category: Option<String>,
    /// Comma-separated tags.
    #[serde(default)]
    pub tags: Option<String>,
    /// Times the post has been viewed.
    #[serde(default)]
    pub view_count: u64,
    /// When the post was published.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_tolerates_missing_optionals() {
        let summary: BlogPostSummary = serde_json::from_str(
            r#"{"id": 9, "title": "AI Marketing Trends", "slug": "ai-marketing-trends"}"#,
        )
        .expect("deserialize");
        assert_eq!(summary.id, BlogPostId::new(9));
        assert!(summary.excerpt.is_none());
        assert!(summary.published_at.is_none());
    }
}
