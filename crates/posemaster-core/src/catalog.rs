//! Composition archetypes that parameterize the photo-guide fan-out.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One composition style, e.g. rule of thirds or low angle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionArchetype {
    /// Stable machine identifier.
    pub key: String,
    /// Human-readable label shown next to the generated image.
    pub label: String,
    /// Instruction spliced into the image prompt.
    pub prompt_fragment: String,
}

impl CompositionArchetype {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        prompt_fragment: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            prompt_fragment: prompt_fragment.into(),
        }
    }
}

static STANDARD_CATALOG: Lazy<CompositionCatalog> = Lazy::new(|| {
    CompositionCatalog::new(vec![
        CompositionArchetype::new(
            "rule_of_thirds",
            "三分法构图",
            "Rule of thirds composition: place the subjects on the left or right third line, \
             natural and relaxed standing pose, eye level camera.",
        ),
        CompositionArchetype::new(
            "low_angle",
            "低角度仰拍",
            "Low-angle shot from below the waist, subjects look tall and confident, \
             sky or ceiling visible behind them.",
        ),
        CompositionArchetype::new(
            "leading_lines",
            "引导线构图",
            "Leading lines composition: use paths, railings or architectural edges in the scene \
             to draw the eye toward the subjects, who are walking or mid-stride.",
        ),
        CompositionArchetype::new(
            "close_up",
            "近景特写",
            "Close-up portrait framing from the chest up, shallow depth of field, \
             expressive faces and hands, background softly blurred.",
        ),
        CompositionArchetype::new(
            "symmetry",
            "对称构图",
            "Centered symmetrical composition, subjects placed on the vertical center axis, \
             balanced framing with the environment on both sides.",
        ),
        CompositionArchetype::new(
            "negative_space",
            "留白构图",
            "Negative space composition: subjects small in the frame, interacting with the \
             environment (sitting or leaning), large areas of open background.",
        ),
    ])
});

/// Ordered, read-only list of archetypes.
///
/// Order is stable across calls; the orchestrator issues one image and one
/// advice request per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionCatalog {
    entries: Vec<CompositionArchetype>,
}

impl CompositionCatalog {
    pub fn new(entries: Vec<CompositionArchetype>) -> Self {
        Self { entries }
    }

    /// The built-in six-entry catalog.
    pub fn standard() -> &'static CompositionCatalog {
        &STANDARD_CATALOG
    }

    pub fn entries(&self) -> &[CompositionArchetype] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CompositionArchetype> {
        self.entries.iter().find(|entry| entry.key == key)
    }
}

impl Default for CompositionCatalog {
    fn default() -> Self {
        Self::standard().clone()
    }
}
