//! Scene and style selections made in the first two wizard steps.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PoseMasterError, Result};
use crate::image_ref::{EmbeddedImage, ImageRef};

/// Where a scene came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneOrigin {
    Preset,
    Uploaded,
    /// Referenced by URL; fetched when the batch is generated.
    Linked,
    Generated,
}

/// Where a style reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleOrigin {
    Preset,
    Generated,
}

/// Number of people in the shoot, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct HeadCount(u8);

impl HeadCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Validates a head count coming from the caller.
    ///
    /// Out-of-range values are rejected rather than clamped.
    pub fn new(value: u32) -> Result<Self> {
        if (u32::from(Self::MIN)..=u32::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(PoseMasterError::InvalidHeadCount(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for HeadCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for HeadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for HeadCount {
    type Error = PoseMasterError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<HeadCount> for u32 {
    fn from(count: HeadCount) -> Self {
        u32::from(count.0)
    }
}

/// The background scene chosen in step one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSelection {
    pub id: String,
    pub image: ImageRef,
    pub description: String,
    pub origin: SceneOrigin,
}

impl SceneSelection {
    pub fn preset(id: impl Into<String>, image: ImageRef, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image,
            description: description.into(),
            origin: SceneOrigin::Preset,
        }
    }

    pub fn uploaded(image: EmbeddedImage, description: impl Into<String>) -> Self {
        Self {
            id: format!("upload-{}", Uuid::new_v4()),
            image: image.into(),
            description: description.into(),
            origin: SceneOrigin::Uploaded,
        }
    }

    /// A scene given as an image URL. The reference stays remote.
    pub fn linked(url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: format!("link-{}", Uuid::new_v4()),
            image: ImageRef::remote(url),
            description: description.into(),
            origin: SceneOrigin::Linked,
        }
    }

    pub fn generated(image: EmbeddedImage, description: impl Into<String>) -> Self {
        Self {
            id: format!("gen-{}", Uuid::new_v4()),
            image: image.into(),
            description: description.into(),
            origin: SceneOrigin::Generated,
        }
    }
}

/// The apparel/style reference chosen in step two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSelection {
    pub id: String,
    pub image: ImageRef,
    pub description: String,
    pub head_count: HeadCount,
    pub origin: StyleOrigin,
}

impl StyleSelection {
    pub fn preset(
        id: impl Into<String>,
        image: ImageRef,
        description: impl Into<String>,
        head_count: HeadCount,
    ) -> Self {
        Self {
            id: id.into(),
            image,
            description: description.into(),
            head_count,
            origin: StyleOrigin::Preset,
        }
    }

    pub fn generated(
        image: EmbeddedImage,
        description: impl Into<String>,
        head_count: HeadCount,
    ) -> Self {
        Self {
            id: format!("style-gen-{}", Uuid::new_v4()),
            image: image.into(),
            description: description.into(),
            head_count,
            origin: StyleOrigin::Generated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_count_bounds() {
        assert!(HeadCount::new(1).is_ok());
        assert!(HeadCount::new(10).is_ok());
        assert_eq!(
            HeadCount::new(0).unwrap_err(),
            PoseMasterError::InvalidHeadCount(0)
        );
        assert_eq!(
            HeadCount::new(11).unwrap_err(),
            PoseMasterError::InvalidHeadCount(11)
        );
    }

    #[test]
    fn test_head_count_deserialize_rejects_out_of_range() {
        let ok: HeadCount = serde_json::from_str("3").unwrap();
        assert_eq!(ok.get(), 3);
        assert!(serde_json::from_str::<HeadCount>("42").is_err());
    }

    #[test]
    fn test_generated_selections_get_unique_ids() {
        let image = EmbeddedImage::new("image/png", vec![1, 2, 3]);
        let a = SceneSelection::generated(image.clone(), "forest");
        let b = SceneSelection::generated(image, "forest");
        assert_ne!(a.id, b.id);
        assert_eq!(a.origin, SceneOrigin::Generated);
    }

    #[test]
    fn test_uploaded_scene_is_embedded() {
        let scene = SceneSelection::uploaded(EmbeddedImage::new("image/jpeg", vec![9]), "my room");
        assert_eq!(scene.origin, SceneOrigin::Uploaded);
        assert!(scene.image.as_embedded().is_some());
    }

    #[test]
    fn test_linked_scene_keeps_remote_reference() {
        let scene = SceneSelection::linked("https://example.com/rooftop.jpg", "rooftop");
        assert_eq!(scene.origin, SceneOrigin::Linked);
        assert!(scene.id.starts_with("link-"));
        assert_eq!(scene.image, ImageRef::remote("https://example.com/rooftop.jpg"));
        assert!(scene.image.as_embedded().is_none());
    }
}
