use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use posemaster_application::{PhotoGuideOrchestrator, PhotoShootUseCase, SelectionService};
use posemaster_core::generation::GenerationBatch;
use posemaster_core::image_ref::ImageRef;
use posemaster_core::selection::{HeadCount, SceneSelection, StyleSelection};
use posemaster_infrastructure::{PoseMasterPaths, SecretServiceImpl, export_history, read_uploaded_image};
use posemaster_interaction::gemini_gateway::GeminiGateway;
use posemaster_interaction::http_image_fetcher::HttpImageFetcher;
use posemaster_interaction::presets;

use crate::ShootArgs;

const UPLOADED_SCENE_DESCRIPTION: &str = "用户上传场景";
const LINKED_SCENE_DESCRIPTION: &str = "用户提供的场景图片";

pub async fn run(config_dir: Option<&Path>, args: ShootArgs) -> Result<()> {
    let head_count = HeadCount::new(args.people)?;

    let secrets = Arc::new(SecretServiceImpl::new(config_dir)?);
    let mut gateway = GeminiGateway::new(secrets);
    if let Some(model) = &args.image_model {
        gateway = gateway.with_image_model(model);
    }
    if let Some(model) = &args.text_model {
        gateway = gateway.with_text_model(model);
    }
    let gateway = Arc::new(gateway);
    let fetcher = Arc::new(HttpImageFetcher::new());

    let selections = SelectionService::new(gateway.clone());
    let scene = resolve_scene(&args, &selections).await?;
    tracing::debug!(scene_id = %scene.id, origin = ?scene.origin, "Resolved scene");
    let style = resolve_style(&args, &selections, head_count).await?;

    let use_case = PhotoShootUseCase::new(Arc::new(PhotoGuideOrchestrator::new(gateway, fetcher)));
    println!("Scene: {} ({})", scene.description, scene.id);
    use_case.select_scene(scene).await?;
    println!("Style: {} ({}), {} people", style.description, style.id, head_count);

    let batch = use_case
        .select_style(style)
        .await
        .context("Generation failed, please choose a scene again")?;

    let out_dir = match args.out {
        Some(dir) => dir,
        None => PoseMasterPaths::new(config_dir).export_dir()?,
    };
    let history = use_case.history().await;
    let written = export_history(&history, &out_dir).await?;
    tracing::info!(batch_id = batch.id(), "Wrote {} file(s) to {}", written.len(), out_dir.display());
    print_batch(&batch, &written);
    Ok(())
}

async fn resolve_scene(args: &ShootArgs, selections: &SelectionService) -> Result<SceneSelection> {
    if let Some(prompt) = &args.scene_prompt {
        return Ok(selections.generate_scene(prompt).await?);
    }

    let scene = args
        .scene
        .as_deref()
        .ok_or_else(|| anyhow!("Either --scene or --scene-prompt is required"))?;

    if let Some(preset) = presets::find_scene(scene) {
        return Ok(preset);
    }

    let description = args.scene_description.as_deref();
    let path = PathBuf::from(scene);
    if path.is_file() {
        let image = read_uploaded_image(&path).await?;
        return Ok(SceneSelection::uploaded(
            image,
            description.unwrap_or(UPLOADED_SCENE_DESCRIPTION),
        ));
    }

    // Remote scenes stay remote; the orchestrator fetches them once per batch.
    match ImageRef::parse(scene)
        .with_context(|| format!("'{scene}' is not a preset id, a file, or an image URL"))?
    {
        ImageRef::Embedded(image) => Ok(SceneSelection::uploaded(
            image,
            description.unwrap_or(UPLOADED_SCENE_DESCRIPTION),
        )),
        ImageRef::Remote(remote) => Ok(SceneSelection::linked(
            remote.url(),
            description.unwrap_or(LINKED_SCENE_DESCRIPTION),
        )),
    }
}

async fn resolve_style(
    args: &ShootArgs,
    selections: &SelectionService,
    head_count: HeadCount,
) -> Result<StyleSelection> {
    if let Some(prompt) = &args.style_prompt {
        return Ok(selections.generate_style(prompt, head_count).await?);
    }

    let id = args
        .style
        .as_deref()
        .ok_or_else(|| anyhow!("Either --style or --style-prompt is required"))?;
    presets::find_style(id, head_count).ok_or_else(|| anyhow!("Unknown style preset '{id}'"))
}

fn print_batch(batch: &GenerationBatch, written: &[PathBuf]) {
    println!();
    println!("Generated {} variant(s), batch {}", batch.len(), batch.id());
    for (item, path) in batch.items().iter().zip(written) {
        println!();
        println!("== {} ==", item.label);
        println!("{}", path.display());
        println!("{}", item.advice);
    }
}
