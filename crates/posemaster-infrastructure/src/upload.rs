//! Reading user-uploaded image files.

use std::path::Path;

use posemaster_core::error::{PoseMasterError, Result};
use posemaster_core::image_ref::EmbeddedImage;

/// Reads an image file from disk into an [`EmbeddedImage`].
///
/// The media type is guessed from the file extension; non-image files and
/// empty files are rejected as malformed references.
pub async fn read_uploaded_image(path: &Path) -> Result<EmbeddedImage> {
    let mime = mime_guess::from_path(path).first().ok_or_else(|| {
        PoseMasterError::malformed(format!("cannot determine media type of {}", path.display()))
    })?;
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(PoseMasterError::malformed(format!(
            "{} is not an image ({})",
            path.display(),
            mime.essence_str()
        )));
    }

    let bytes = tokio::fs::read(path).await?;
    if bytes.is_empty() {
        return Err(PoseMasterError::malformed(format!(
            "{} is empty",
            path.display()
        )));
    }

    tracing::debug!(
        "Read uploaded image {:?} ({} bytes, {})",
        path,
        bytes.len(),
        mime.essence_str()
    );
    Ok(EmbeddedImage::new(mime.essence_str(), bytes))
}
