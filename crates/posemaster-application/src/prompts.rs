//! Prompt templates sent to the generation gateway.
//!
//! Templates are Jinja2 (minijinja) so the wording stays readable in one
//! place; values are substituted verbatim.

use minijinja::{Environment, context};
use once_cell::sync::Lazy;
use posemaster_core::catalog::CompositionArchetype;
use posemaster_core::error::{PoseMasterError, Result};
use posemaster_core::selection::HeadCount;

const COMPOSITION_IMAGE: &str = "composition_image";
const COMPOSITION_ADVICE: &str = "composition_advice";
const STYLE_REFERENCE: &str = "style_reference";

const COMPOSITION_IMAGE_TEMPLATE: &str = "Create a photorealistic composite image based on the provided scene. \
Add {{ head_count }} model(s) wearing {{ style }}. \
Composition: {{ fragment }} \
Maintain the background details.";

const COMPOSITION_ADVICE_TEMPLATE: &str = r#"作为一名专业摄影师，请根据以下信息，针对「{{ label }}」构图提供拍摄建议：
场景：{{ scene }}
人数：{{ head_count }}人
风格：{{ style }}
构图：{{ label }}

请用中文按以下标签分段给出：
【站位】推荐站位。
【动作与表情】具体的动作与表情指导。
【拍摄角度】机位高度与角度。
【光线】光线运用建议。
【构图理由】为什么这种构图适合此场景和风格。

回答请简洁明了，语气专业亲切，总字数不要超过150字。"#;

const STYLE_REFERENCE_TEMPLATE: &str = "A clear photo showing fashion style: {{ description }}. \
Clothes only or models wearing clothes. White background preferred.";

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    for (name, source) in [
        (COMPOSITION_IMAGE, COMPOSITION_IMAGE_TEMPLATE),
        (COMPOSITION_ADVICE, COMPOSITION_ADVICE_TEMPLATE),
        (STYLE_REFERENCE, STYLE_REFERENCE_TEMPLATE),
    ] {
        if let Err(err) = env.add_template(name, source) {
            tracing::error!("Invalid built-in template '{name}': {err}");
        }
    }
    env
});

fn render(name: &str, ctx: minijinja::Value) -> Result<String> {
    TEMPLATES
        .get_template(name)
        .and_then(|template| template.render(ctx))
        .map_err(|err| PoseMasterError::Template(format!("{name}: {err}")))
}

/// Image prompt for one archetype.
pub fn composition_image_prompt(
    archetype: &CompositionArchetype,
    head_count: HeadCount,
    style_description: &str,
) -> Result<String> {
    render(
        COMPOSITION_IMAGE,
        context! {
            head_count => head_count.get(),
            style => style_description,
            fragment => archetype.prompt_fragment.as_str(),
        },
    )
}

/// Chinese advice prompt for one archetype.
pub fn composition_advice_prompt(
    archetype: &CompositionArchetype,
    scene_description: &str,
    head_count: HeadCount,
    style_description: &str,
) -> Result<String> {
    render(
        COMPOSITION_ADVICE,
        context! {
            label => archetype.label.as_str(),
            scene => scene_description,
            head_count => head_count.get(),
            style => style_description,
        },
    )
}

/// Prompt for generating a style reference image from a description.
pub fn style_reference_prompt(description: &str) -> Result<String> {
    render(STYLE_REFERENCE, context! { description => description })
}
