//! Append-only log of completed shoots.

use serde::Serialize;

use crate::generation::GenerationBatch;
use crate::image_ref::EmbeddedImage;
use crate::selection::{SceneSelection, StyleSelection};

/// One completed (scene, style, batch) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub scene: SceneSelection,
    pub style: StyleSelection,
    pub batch: GenerationBatch,
}

/// Ordered history of the current process's shoots.
///
/// Entries are only ever appended; nothing is removed or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Image of variant `item` in entry `entry`, for export.
    pub fn image(&self, entry: usize, item: usize) -> Option<&EmbeddedImage> {
        self.entries
            .get(entry)?
            .batch
            .items()
            .get(item)
            .map(|variant| &variant.image)
    }

    /// Iterates over every exportable image as `(file name, image)`.
    pub fn export_images(&self) -> impl Iterator<Item = (String, &EmbeddedImage)> + '_ {
        self.entries.iter().flat_map(|entry| {
            entry
                .batch
                .items()
                .iter()
                .enumerate()
                .filter_map(move |(index, variant)| {
                    entry
                        .batch
                        .export_file_name(index)
                        .map(|name| (name, &variant.image))
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GeneratedVariant;
    use crate::image_ref::ImageRef;
    use crate::selection::HeadCount;

    fn entry(label: &str, images: usize) -> HistoryEntry {
        let items = (0..images)
            .map(|i| GeneratedVariant {
                archetype_key: format!("k{i}"),
                label: label.to_string(),
                image: EmbeddedImage::new("image/png", vec![i as u8]),
                advice: "ok".to_string(),
            })
            .collect();
        HistoryEntry {
            scene: SceneSelection::preset("s1", ImageRef::remote("https://example.com/s.jpg"), "scene"),
            style: StyleSelection::preset(
                "st1",
                ImageRef::remote("https://example.com/st.jpg"),
                "style",
                HeadCount::default(),
            ),
            batch: GenerationBatch::new(items, images).unwrap(),
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let mut history = SessionHistory::new();
        history.append(entry("first", 1));
        history.append(entry("second", 2));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].batch.items()[0].label, "first");
        assert_eq!(history.latest().unwrap().batch.items()[0].label, "second");
    }

    #[test]
    fn test_images_are_individually_addressable() {
        let mut history = SessionHistory::new();
        history.append(entry("first", 2));

        assert_eq!(history.image(0, 1).unwrap().bytes(), &[1]);
        assert!(history.image(0, 2).is_none());
        assert!(history.image(1, 0).is_none());
    }

    #[test]
    fn test_export_images_covers_every_variant() {
        let mut history = SessionHistory::new();
        history.append(entry("first", 2));
        history.append(entry("second", 3));

        let names: Vec<_> = history.export_images().map(|(name, _)| name).collect();
        assert_eq!(names.len(), 5);
        assert!(names.iter().all(|n| n.starts_with("posemaster-res-") && n.ends_with(".png")));
    }
}
