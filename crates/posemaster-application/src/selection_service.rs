//! Builds scene and style selections that need the generation gateway.

use std::sync::Arc;

use posemaster_core::error::{PoseMasterError, Result};
use posemaster_core::generation::GenerationGateway;
use posemaster_core::selection::{HeadCount, SceneSelection, StyleSelection};

use crate::prompts;

/// Generates scene and style references from free-text prompts.
pub struct SelectionService {
    gateway: Arc<dyn GenerationGateway>,
}

impl SelectionService {
    pub fn new(gateway: Arc<dyn GenerationGateway>) -> Self {
        Self { gateway }
    }

    /// Generates a background scene; the prompt doubles as its description.
    pub async fn generate_scene(&self, prompt: &str) -> Result<SceneSelection> {
        let prompt = non_blank(prompt, "scene prompt")?;
        self.gateway.preflight().await?;

        tracing::info!("Generating scene from prompt");
        let image = self.gateway.generate_image(prompt, None).await?;
        Ok(SceneSelection::generated(image, prompt))
    }

    /// Generates a style reference image for `description`.
    pub async fn generate_style(
        &self,
        description: &str,
        head_count: HeadCount,
    ) -> Result<StyleSelection> {
        let description = non_blank(description, "style description")?;
        self.gateway.preflight().await?;

        let prompt = prompts::style_reference_prompt(description)?;
        tracing::info!(head_count = head_count.get(), "Generating style reference");
        let image = self.gateway.generate_image(&prompt, None).await?;
        Ok(StyleSelection::generated(image, description, head_count))
    }
}

fn non_blank<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PoseMasterError::invalid_input(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use posemaster_core::image_ref::EmbeddedImage;
    use posemaster_core::selection::{SceneOrigin, StyleOrigin};

    use super::*;

    #[derive(Default)]
    struct RecordingGateway {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GenerationGateway for RecordingGateway {
        async fn generate_image(
            &self,
            prompt: &str,
            reference: Option<&EmbeddedImage>,
        ) -> Result<EmbeddedImage> {
            assert!(reference.is_none());
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(EmbeddedImage::new("image/png", vec![7]))
        }

        async fn generate_text(&self, _prompt: &str) -> Result<String> {
            unreachable!("selection service never asks for text")
        }
    }

    #[tokio::test]
    async fn test_generate_scene_uses_prompt_as_description() {
        let gateway = Arc::new(RecordingGateway::default());
        let service = SelectionService::new(gateway.clone());

        let scene = service.generate_scene("  海边日落  ").await.unwrap();
        assert_eq!(scene.origin, SceneOrigin::Generated);
        assert_eq!(scene.description, "海边日落");
        assert!(scene.id.starts_with("gen-"));
        assert_eq!(gateway.prompts.lock().unwrap().as_slice(), ["海边日落"]);
    }

    #[tokio::test]
    async fn test_generate_style_wraps_description() {
        let gateway = Arc::new(RecordingGateway::default());
        let service = SelectionService::new(gateway.clone());

        let style = service
            .generate_style("gothic lolita", HeadCount::new(4).unwrap())
            .await
            .unwrap();
        assert_eq!(style.origin, StyleOrigin::Generated);
        assert_eq!(style.head_count.get(), 4);
        assert_eq!(style.description, "gothic lolita");

        let prompts = gateway.prompts.lock().unwrap();
        assert!(prompts[0].starts_with("A clear photo showing fashion style: gothic lolita."));
    }

    #[tokio::test]
    async fn test_blank_prompts_are_rejected() {
        let gateway = Arc::new(RecordingGateway::default());
        let service = SelectionService::new(gateway.clone());

        let err = service.generate_scene("   ").await.unwrap_err();
        assert!(matches!(err, PoseMasterError::InvalidInput(_)));
        let err = service
            .generate_style("", HeadCount::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PoseMasterError::InvalidInput(_)));
        assert!(gateway.prompts.lock().unwrap().is_empty());
    }
}
