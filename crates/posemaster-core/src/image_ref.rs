//! Image references used by scenes, styles and generated variants.
//!
//! A reference is either self-contained (a `data:` URL carrying the media type
//! and base64 payload) or remote (an `http(s)` URL that must be fetched before
//! it can be sent to the model). Everything produced internally is embedded.

use std::fmt;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{PoseMasterError, Result};

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Decoded image bytes together with their media type.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EmbeddedImage {
    media_type: String,
    bytes: Vec<u8>,
}

impl EmbeddedImage {
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Builds an image from a base64 payload as returned by the model API.
    pub fn from_base64(media_type: impl Into<String>, data: &str) -> Result<Self> {
        let bytes = BASE64_STANDARD.decode(data.trim())?;
        Ok(Self::new(media_type, bytes))
    }

    /// Parses `data:<media-type>;base64,<payload>`.
    pub fn from_data_url(value: &str) -> Result<Self> {
        let rest = value
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or_else(|| PoseMasterError::malformed("missing 'data:' prefix"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| PoseMasterError::malformed("missing data segment"))?;
        let media_type = meta
            .strip_suffix(BASE64_MARKER)
            .ok_or_else(|| PoseMasterError::malformed("only base64 data URLs are supported"))?;

        if media_type.is_empty() {
            return Err(PoseMasterError::malformed("missing media type"));
        }
        if payload.is_empty() {
            return Err(PoseMasterError::malformed("missing data segment"));
        }

        Self::from_base64(media_type, payload)
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 payload without the `data:` envelope.
    pub fn base64_data(&self) -> String {
        BASE64_STANDARD.encode(&self.bytes)
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "{DATA_URL_PREFIX}{}{BASE64_MARKER},{}",
            self.media_type,
            self.base64_data()
        )
    }

    /// File extension matching the media type, used when exporting images.
    pub fn file_extension(&self) -> &'static str {
        match self.media_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

// Payloads can be megabytes; keep Debug output readable.
impl fmt::Debug for EmbeddedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedImage")
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl From<EmbeddedImage> for String {
    fn from(image: EmbeddedImage) -> Self {
        image.to_data_url()
    }
}

impl TryFrom<String> for EmbeddedImage {
    type Error = PoseMasterError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_data_url(&value)
    }
}

/// An image that lives behind an `http(s)` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteImage {
    url: String,
}

impl RemoteImage {
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Either an embedded image or a remote one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ImageRef {
    Embedded(EmbeddedImage),
    Remote(RemoteImage),
}

impl ImageRef {
    /// Parses a reference string.
    ///
    /// `data:` URLs become [`ImageRef::Embedded`], `http://` and `https://`
    /// URLs become [`ImageRef::Remote`]. Anything else is rejected with
    /// [`PoseMasterError::MalformedReference`].
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.starts_with(DATA_URL_PREFIX) {
            return EmbeddedImage::from_data_url(value).map(Self::Embedded);
        }
        if value.starts_with("https://") || value.starts_with("http://") {
            return Ok(Self::remote(value));
        }
        Err(PoseMasterError::malformed(format!(
            "unsupported image reference '{}'",
            truncate_for_display(value)
        )))
    }

    pub fn remote(url: impl Into<String>) -> Self {
        Self::Remote(RemoteImage { url: url.into() })
    }

    pub fn as_embedded(&self) -> Option<&EmbeddedImage> {
        match self {
            Self::Embedded(image) => Some(image),
            Self::Remote(_) => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl From<EmbeddedImage> for ImageRef {
    fn from(image: EmbeddedImage) -> Self {
        Self::Embedded(image)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded(image) => f.write_str(&image.to_data_url()),
            Self::Remote(remote) => f.write_str(&remote.url),
        }
    }
}

impl From<ImageRef> for String {
    fn from(reference: ImageRef) -> Self {
        reference.to_string()
    }
}

impl TryFrom<String> for ImageRef {
    type Error = PoseMasterError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

/// Resolves remote image references to bytes.
#[async_trait]
pub trait RemoteImageFetcher: Send + Sync {
    /// Fetches the image behind `remote`.
    ///
    /// Implementations fail with [`PoseMasterError::SourceUnavailable`] when
    /// the source cannot be reached or answers with a non-success status.
    async fn fetch(&self, remote: &RemoteImage) -> Result<EmbeddedImage>;
}

/// Normalizes any reference into an [`EmbeddedImage`].
///
/// Embedded references are returned unchanged; remote references are fetched
/// exactly once through `fetcher`.
pub async fn normalize_reference(
    reference: &ImageRef,
    fetcher: &dyn RemoteImageFetcher,
) -> Result<EmbeddedImage> {
    match reference {
        ImageRef::Embedded(image) => Ok(image.clone()),
        ImageRef::Remote(remote) => fetcher.fetch(remote).await,
    }
}

fn truncate_for_display(value: &str) -> String {
    const MAX_CHARS: usize = 48;
    if value.chars().count() <= MAX_CHARS {
        value.to_string()
    } else {
        let head: String = value.chars().take(MAX_CHARS).collect();
        format!("{head}...")
    }
}
