use anyhow::Result;
use posemaster_core::selection::HeadCount;
use posemaster_interaction::presets::{default_scenes, default_styles};

pub fn run(json: bool) -> Result<()> {
    let scenes = default_scenes();
    let styles = default_styles(HeadCount::default());

    if json {
        let value = serde_json::json!({ "scenes": scenes, "styles": styles });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Scenes:");
    for scene in &scenes {
        println!("  {:<4} {}  ({})", scene.id, scene.description, scene.image);
    }
    println!("Styles:");
    for style in &styles {
        println!("  {:<4} {}  ({})", style.id, style.description, style.image);
    }
    Ok(())
}
