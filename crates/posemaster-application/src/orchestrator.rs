//! Photo-guide orchestration.
//!
//! One call to [`PhotoGuideOrchestrator::generate`] issues an image request
//! and an advice request for every archetype in the catalog, all at once,
//! then joins them per archetype and assembles the batch in catalog order.

use std::sync::Arc;

use futures::future::join_all;
use posemaster_core::catalog::{CompositionArchetype, CompositionCatalog};
use posemaster_core::error::{PoseMasterError, Result};
use posemaster_core::generation::{GeneratedVariant, GenerationBatch, GenerationGateway};
use posemaster_core::image_ref::{EmbeddedImage, ImageRef, RemoteImageFetcher, normalize_reference};
use posemaster_core::selection::HeadCount;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::prompts;

/// Advice shown when the advice request for a variant fails.
pub const ADVICE_FALLBACK: &str = "抱歉，生成建议时出现错误。建议您根据光线和场景自然调整站位。";

/// Fans out composition variants to the generation gateway.
pub struct PhotoGuideOrchestrator {
    gateway: Arc<dyn GenerationGateway>,
    fetcher: Arc<dyn RemoteImageFetcher>,
    catalog: CompositionCatalog,
}

/// The two in-flight requests of one archetype.
struct PendingVariant {
    archetype: CompositionArchetype,
    image: JoinHandle<Result<EmbeddedImage>>,
    advice: JoinHandle<Result<String>>,
}

/// Joined outcome slot of one archetype.
struct VariantOutcome {
    archetype: CompositionArchetype,
    image: Result<EmbeddedImage>,
    advice: Result<String>,
}

impl PendingVariant {
    async fn join(self) -> VariantOutcome {
        let (image, advice) = tokio::join!(self.image, self.advice);
        VariantOutcome {
            archetype: self.archetype,
            image: image.unwrap_or_else(|err| Err(task_failure("image", err))),
            advice: advice.unwrap_or_else(|err| Err(task_failure("advice", err))),
        }
    }
}

impl VariantOutcome {
    /// Applies the per-variant failure policies.
    ///
    /// A failed image drops the variant; a failed advice is replaced by
    /// [`ADVICE_FALLBACK`].
    fn into_variant(self) -> Option<GeneratedVariant> {
        let Self {
            archetype,
            image,
            advice,
        } = self;

        let image = match image {
            Ok(image) => image,
            Err(err) => {
                log_variant_failure(&archetype.key, "Dropping variant, image failed", &err);
                return None;
            }
        };

        Some(GeneratedVariant {
            advice: advice_or_fallback(&archetype.key, advice),
            archetype_key: archetype.key,
            label: archetype.label,
            image,
        })
    }
}

fn advice_or_fallback(archetype_key: &str, advice: Result<String>) -> String {
    match advice {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            tracing::warn!(archetype = %archetype_key, "Advice was empty, using fallback");
            ADVICE_FALLBACK.to_string()
        }
        Err(err) => {
            log_variant_failure(archetype_key, "Advice failed, using fallback", &err);
            ADVICE_FALLBACK.to_string()
        }
    }
}

// Model-side failures are expected; anything else points at a local fault.
fn log_variant_failure(archetype_key: &str, what: &str, err: &PoseMasterError) {
    if err.is_generation_failure() {
        tracing::warn!(archetype = %archetype_key, "{what}: {err}");
    } else {
        tracing::error!(archetype = %archetype_key, "{what}: {err}");
    }
}

fn task_failure(kind: &str, err: tokio::task::JoinError) -> PoseMasterError {
    PoseMasterError::internal(format!("{kind} task did not complete: {err}"))
}

impl PhotoGuideOrchestrator {
    /// Creates an orchestrator over the standard catalog.
    pub fn new(gateway: Arc<dyn GenerationGateway>, fetcher: Arc<dyn RemoteImageFetcher>) -> Self {
        Self {
            gateway,
            fetcher,
            catalog: CompositionCatalog::standard().clone(),
        }
    }

    /// Replaces the catalog that drives the fan-out.
    pub fn with_catalog(mut self, catalog: CompositionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &CompositionCatalog {
        &self.catalog
    }

    /// Generates one batch of composition variants.
    ///
    /// The scene reference is normalized once before any request is issued;
    /// its failure (and a missing credential) propagate unchanged. Individual
    /// variant failures are absorbed. Fails with `BatchGenerationFailed` only
    /// when no variant produced an image.
    pub async fn generate(
        &self,
        scene_ref: &ImageRef,
        scene_description: &str,
        head_count: HeadCount,
        style_description: &str,
    ) -> Result<GenerationBatch> {
        self.gateway.preflight().await?;
        let scene_image = Arc::new(normalize_reference(scene_ref, self.fetcher.as_ref()).await?);

        // A template error must surface before the first request is launched.
        let mut rendered = Vec::with_capacity(self.catalog.len());
        for archetype in self.catalog.entries() {
            let image_prompt =
                prompts::composition_image_prompt(archetype, head_count, style_description)?;
            let advice_prompt = prompts::composition_advice_prompt(
                archetype,
                scene_description,
                head_count,
                style_description,
            )?;
            rendered.push((archetype.clone(), image_prompt, advice_prompt));
        }

        let attempted = rendered.len();
        tracing::info!(
            attempted,
            head_count = head_count.get(),
            "Launching {} composition requests",
            attempted * 2
        );

        let pending: Vec<PendingVariant> = rendered
            .into_iter()
            .map(|(archetype, image_prompt, advice_prompt)| PendingVariant {
                image: self.spawn_image(&archetype, image_prompt, Arc::clone(&scene_image)),
                advice: self.spawn_advice(&archetype, advice_prompt),
                archetype,
            })
            .collect();

        let outcomes = join_all(pending.into_iter().map(PendingVariant::join)).await;
        let items: Vec<GeneratedVariant> = outcomes
            .into_iter()
            .filter_map(VariantOutcome::into_variant)
            .collect();

        let batch = GenerationBatch::new(items, attempted).inspect_err(|_| {
            tracing::error!("All {attempted} composition images failed");
        })?;

        tracing::info!(
            batch_id = batch.id(),
            "Generated {}/{} composition variants",
            batch.len(),
            attempted
        );
        Ok(batch)
    }

    // Spawned tasks are detached: they finish even if `generate` is dropped.
    fn spawn_image(
        &self,
        archetype: &CompositionArchetype,
        prompt: String,
        scene_image: Arc<EmbeddedImage>,
    ) -> JoinHandle<Result<EmbeddedImage>> {
        let gateway = Arc::clone(&self.gateway);
        let span = tracing::debug_span!("variant_image", archetype = %archetype.key);
        tokio::spawn(
            async move { gateway.generate_image(&prompt, Some(scene_image.as_ref())).await }
                .instrument(span),
        )
    }

    fn spawn_advice(
        &self,
        archetype: &CompositionArchetype,
        prompt: String,
    ) -> JoinHandle<Result<String>> {
        let gateway = Arc::clone(&self.gateway);
        let span = tracing::debug_span!("variant_advice", archetype = %archetype.key);
        tokio::spawn(async move { gateway.generate_text(&prompt).await }.instrument(span))
    }
}
