//! Generated variants, batches, and the boundary to the generative model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PoseMasterError, Result};
use crate::image_ref::EmbeddedImage;

/// One archetype's paired image, advice and label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedVariant {
    pub archetype_key: String,
    pub label: String,
    pub image: EmbeddedImage,
    pub advice: String,
}

/// All variants produced by one orchestration call.
///
/// Items are never empty and keep the catalog order of the archetypes that
/// succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationBatch {
    id: String,
    items: Vec<GeneratedVariant>,
    created_at: DateTime<Utc>,
}

impl GenerationBatch {
    /// Creates a batch with a fresh id and the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns `BatchGenerationFailed` if `items` is empty; `attempted` is the
    /// number of archetypes that were requested.
    pub fn new(items: Vec<GeneratedVariant>, attempted: usize) -> Result<Self> {
        if items.is_empty() {
            return Err(PoseMasterError::BatchGenerationFailed { attempted });
        }
        Ok(Self {
            id: format!("res-{}", Uuid::new_v4()),
            items,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn items(&self) -> &[GeneratedVariant] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Suggested download file name for the item at `index`.
    pub fn export_file_name(&self, index: usize) -> Option<String> {
        self.items
            .get(index)
            .map(|item| format!("posemaster-{}-{}.{}", self.id, index + 1, item.image.file_extension()))
    }
}

/// The sole boundary to the external generative model.
///
/// Calls are independent and may be issued concurrently; implementations keep
/// no per-call state.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Resolves whatever the gateway needs before issuing requests.
    ///
    /// Fails with `Config` when the service credential is missing.
    async fn preflight(&self) -> Result<()> {
        Ok(())
    }

    /// Generates an image from `prompt`, optionally conditioned on `reference`.
    ///
    /// Fails with `NoImageProduced` if the response carries no image part and
    /// `Upstream` on transport or service failure.
    async fn generate_image(
        &self,
        prompt: &str,
        reference: Option<&EmbeddedImage>,
    ) -> Result<EmbeddedImage>;

    /// Generates text from `prompt`.
    ///
    /// Fails with `NoTextProduced` if the response carries no text and
    /// `Upstream` on transport or service failure.
    async fn generate_text(&self, prompt: &str) -> Result<String>;
}
