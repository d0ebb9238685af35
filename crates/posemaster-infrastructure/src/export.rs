//! Writing generated images to disk.

use std::path::{Path, PathBuf};

use posemaster_core::error::Result;
use posemaster_core::history::SessionHistory;

/// Writes every variant image recorded in `history` into `dir`.
///
/// Files are named by [`SessionHistory::export_images`]. Returns the written
/// paths in history order.
pub async fn export_history(history: &SessionHistory, dir: &Path) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let mut written = Vec::new();
    for (file_name, image) in history.export_images() {
        let path = dir.join(file_name);
        tokio::fs::write(&path, image.bytes()).await?;
        written.push(path);
    }

    tracing::info!(
        batches = history.len(),
        "Exported {} image(s) to {:?}",
        written.len(),
        dir
    );
    Ok(written)
}
