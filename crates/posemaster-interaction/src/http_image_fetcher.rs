//! Fetches remote scene/style images over HTTP.

use async_trait::async_trait;
use posemaster_core::error::{PoseMasterError, Result};
use posemaster_core::image_ref::{EmbeddedImage, RemoteImage, RemoteImageFetcher};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

const FALLBACK_MEDIA_TYPE: &str = "image/jpeg";

/// [`RemoteImageFetcher`] backed by `reqwest`.
#[derive(Clone, Default)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteImageFetcher for HttpImageFetcher {
    async fn fetch(&self, remote: &RemoteImage) -> Result<EmbeddedImage> {
        let url = remote.url();
        tracing::debug!("Fetching remote image {url}");

        let response = self.client.get(url).send().await.map_err(|err| {
            tracing::error!("Error fetching image {url}: {err}");
            PoseMasterError::source_unavailable(url, err.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Image source {url} answered {status}");
            return Err(PoseMasterError::source_unavailable(
                url,
                format!("Failed to fetch image: {status}"),
            ));
        }

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or_default().trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string());
        if !media_type.to_ascii_lowercase().starts_with("image/") {
            tracing::error!("Image source {url} returned {media_type}");
            return Err(PoseMasterError::source_unavailable(
                url,
                format!("not an image: {media_type}"),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| PoseMasterError::source_unavailable(url, err.to_string()))?;
        if bytes.is_empty() {
            return Err(PoseMasterError::source_unavailable(url, "empty response body"));
        }

        Ok(EmbeddedImage::new(media_type, bytes.to_vec()))
    }
}
