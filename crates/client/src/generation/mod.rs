//! Generation API surface.
//!
//! Generate marketing copy for a product brief and manage the account's
//! generation history (list, inspect, favorite, edit, delete). All calls
//! require an authenticated session; an expired token surfaces through the
//! transport's global 401 contract.

mod wire;

use eqori_core::{GenerationId, GenerationPatch, GenerationRecord, ProductBrief};

use crate::error::ApiError;
use crate::transport::ApiTransport;

use wire::{DeleteAck, WireGeneration, WireGenerationPatch};

/// Default page size for history listings.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Typed access to the generation endpoints.
#[derive(Debug, Clone)]
pub struct GenerationApi {
    transport: ApiTransport,
}

impl GenerationApi {
    pub(crate) const fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    /// Submit a product brief and receive the generated record.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn generate(&self, brief: &ProductBrief) -> Result<GenerationRecord, ApiError> {
        let wire: WireGeneration = self.transport.post("/generation/generate", brief).await?;
        Ok(wire.into())
    }

    /// The account's generation history, newest first.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn history(&self, skip: u32, limit: u32) -> Result<Vec<GenerationRecord>, ApiError> {
        let query = [("skip", skip.to_string()), ("limit", limit.to_string())];
        let wire: Vec<WireGeneration> = self.transport.get("/generation/history", &query).await?;
        Ok(wire.into_iter().map(Into::into).collect())
    }

    /// Fetch a single record by ID.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes; an unknown ID is a 404
    /// [`ApiError::Status`].
    pub async fn get(&self, id: GenerationId) -> Result<GenerationRecord, ApiError> {
        let wire: WireGeneration = self.transport.get(&format!("/generation/{id}"), &[]).await?;
        Ok(wire.into())
    }

    /// Apply a partial update and return the updated record.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn update(
        &self,
        id: GenerationId,
        patch: GenerationPatch,
    ) -> Result<GenerationRecord, ApiError> {
        let body = WireGenerationPatch::from(patch);
        let wire: WireGeneration = self
            .transport
            .put(&format!("/generation/{id}"), &body)
            .await?;
        Ok(wire.into())
    }

    /// Set or clear the favorite flag.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn set_favorite(
        &self,
        id: GenerationId,
        value: bool,
    ) -> Result<GenerationRecord, ApiError> {
        self.update(id, GenerationPatch::favorite(value)).await
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn delete(&self, id: GenerationId) -> Result<(), ApiError> {
        let _ack: DeleteAck = self.transport.delete(&format!("/generation/{id}")).await?;
        Ok(())
    }
}
