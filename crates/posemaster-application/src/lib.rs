//! Application layer for PoseMaster.
//!
//! This crate provides the use cases that drive the domain types: prompt
//! rendering, the photo-guide orchestrator that fans requests out to the
//! generation gateway, selection generation, and the wizard use case that
//! owns the session and its history.

pub mod orchestrator;
pub mod photo_shoot_usecase;
pub mod prompts;
pub mod selection_service;

pub use orchestrator::{ADVICE_FALLBACK, PhotoGuideOrchestrator};
pub use photo_shoot_usecase::PhotoShootUseCase;
pub use selection_service::SelectionService;
