//! Blog read surface.
//!
//! Articles are produced by an external pipeline; this client only lists
//! published posts, enumerates categories, and fetches a post by slug. All
//! three endpoints are public - no session required.

use eqori_core::{BlogPost, BlogPostSummary};

use crate::error::ApiError;
use crate::transport::ApiTransport;

/// Default page size for blog listings.
pub const DEFAULT_BLOG_LIMIT: u32 = 20;

/// Typed access to the blog endpoints.
#[derive(Debug, Clone)]
pub struct BlogApi {
    transport: ApiTransport,
}

impl BlogApi {
    pub(crate) const fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    /// Published posts, newest first, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn list(
        &self,
        skip: u32,
        limit: u32,
        category: Option<&str>,
    ) -> Result<Vec<BlogPostSummary>, ApiError> {
        let mut query = vec![("skip", skip.to_string()), ("limit", limit.to_string())];
        if let Some(category) = category {
            query.push(("category", category.to_string()));
        }
        self.transport.get("/blog/", &query).await
    }

    /// Categories that currently have published posts.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.transport.get("/blog/categories", &[]).await
    }

    /// Fetch a full post by slug.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes; an unknown slug is a 404
    /// [`ApiError::Status`].
    pub async fn get(&self, slug: &str) -> Result<BlogPost, ApiError> {
        self.transport.get(&format!("/blog/{slug}"), &[]).await
    }
}
