use std::path::Path;

use anyhow::{Context, Result};
use posemaster_infrastructure::PoseMasterPaths;

pub fn run(config_dir: Option<&Path>) -> Result<()> {
    let path = PoseMasterPaths::new(config_dir)
        .ensure_secret_file()
        .context("Failed to create secret.json")?;

    println!("Secret file: {}", path.display());
    println!("Add your Gemini API key there, or set GEMINI_API_KEY.");
    Ok(())
}
