use anyhow::Result;
use posemaster_core::catalog::CompositionCatalog;

pub fn run(json: bool) -> Result<()> {
    let catalog = CompositionCatalog::standard();

    if json {
        println!("{}", serde_json::to_string_pretty(catalog)?);
        return Ok(());
    }

    for (index, archetype) in catalog.entries().iter().enumerate() {
        println!("{}. {} [{}]", index + 1, archetype.label, archetype.key);
        println!("   {}", archetype.prompt_fragment);
    }
    Ok(())
}
