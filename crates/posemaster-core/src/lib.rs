//! Domain layer for PoseMaster.
//!
//! Holds the types shared by every other crate: image references, scene and
//! style selections, the composition catalog, generated batches, the wizard
//! state machine and the session history, plus the traits implemented by the
//! infrastructure and interaction layers.

pub mod catalog;
pub mod config;
pub mod error;
pub mod generation;
pub mod history;
pub mod image_ref;
pub mod secret;
pub mod selection;
pub mod wizard;

// Re-export common error type
pub use error::{PoseMasterError, Result};

pub use catalog::{CompositionArchetype, CompositionCatalog};
pub use generation::{GeneratedVariant, GenerationBatch, GenerationGateway};
pub use history::{HistoryEntry, SessionHistory};
pub use image_ref::{EmbeddedImage, ImageRef, RemoteImage, RemoteImageFetcher};
pub use selection::{HeadCount, SceneOrigin, SceneSelection, StyleOrigin, StyleSelection};
pub use wizard::{GenerationRequest, WizardSession, WizardStep};
