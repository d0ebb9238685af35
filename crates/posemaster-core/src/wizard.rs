//! The three-step wizard: scene → style → result.
//!
//! `WizardSession` only holds state and enforces legal transitions. Running
//! the orchestration between `select_style` and `complete_generation` is the
//! application layer's job.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PoseMasterError, Result};
use crate::generation::GenerationBatch;
use crate::history::HistoryEntry;
use crate::selection::{SceneSelection, StyleSelection};

/// Current wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Scene,
    Style,
    Result,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::Scene => "Scene",
            WizardStep::Style => "Style",
            WizardStep::Result => "Result",
        };
        f.write_str(name)
    }
}

/// Snapshot handed to the orchestrator when the style is chosen.
///
/// `ticket` identifies the generation so a late result can be matched against
/// the session that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub ticket: u64,
    pub scene: SceneSelection,
    pub style: StyleSelection,
}

/// State of one user's wizard run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WizardSession {
    step: WizardStep,
    scene: Option<SceneSelection>,
    style: Option<StyleSelection>,
    last_batch: Option<GenerationBatch>,
    #[serde(skip)]
    ticket: u64,
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn scene(&self) -> Option<&SceneSelection> {
        self.scene.as_ref()
    }

    pub fn style(&self) -> Option<&StyleSelection> {
        self.style.as_ref()
    }

    pub fn last_batch(&self) -> Option<&GenerationBatch> {
        self.last_batch.as_ref()
    }

    /// True while in `Result` and the batch has not arrived yet.
    pub fn is_generating(&self) -> bool {
        self.step == WizardStep::Result && self.last_batch.is_none()
    }

    /// Stores the scene and moves to `Style`. Legal only from `Scene`.
    pub fn select_scene(&mut self, scene: SceneSelection) -> Result<()> {
        self.expect_step(WizardStep::Scene, "select_scene")?;
        self.scene = Some(scene);
        self.step = WizardStep::Style;
        Ok(())
    }

    /// Discards the style in progress and returns to `Scene`. Legal only from `Style`.
    pub fn back_to_scene(&mut self) -> Result<()> {
        self.expect_step(WizardStep::Style, "back_to_scene")?;
        self.style = None;
        self.step = WizardStep::Scene;
        Ok(())
    }

    /// Stores the style, moves to `Result` and returns the generation request.
    ///
    /// Legal only from `Style`.
    pub fn select_style(&mut self, style: StyleSelection) -> Result<GenerationRequest> {
        self.expect_step(WizardStep::Style, "select_style")?;
        let scene = self
            .scene
            .clone()
            .ok_or_else(|| PoseMasterError::internal("Style step reached without a scene"))?;

        self.ticket += 1;
        self.style = Some(style.clone());
        self.last_batch = None;
        self.step = WizardStep::Result;

        Ok(GenerationRequest {
            ticket: self.ticket,
            scene,
            style,
        })
    }

    /// Records the batch produced for `request` and returns the history entry
    /// to append.
    ///
    /// Fails with `IllegalTransition` if the session moved on since the
    /// request was issued (reset, or a batch is already recorded).
    pub fn complete_generation(
        &mut self,
        request: &GenerationRequest,
        batch: GenerationBatch,
    ) -> Result<HistoryEntry> {
        if !self.is_generating() || request.ticket != self.ticket {
            return Err(self.illegal("complete_generation"));
        }
        self.last_batch = Some(batch.clone());
        Ok(HistoryEntry {
            scene: request.scene.clone(),
            style: request.style.clone(),
            batch,
        })
    }

    /// Handles a failed generation by resetting to `Scene`.
    ///
    /// Returns false (and changes nothing) if `request` is stale.
    pub fn fail_generation(&mut self, request: &GenerationRequest) -> bool {
        if !self.is_generating() || request.ticket != self.ticket {
            return false;
        }
        self.reset();
        true
    }

    /// Clears scene, style and batch and returns to `Scene`. Legal from any step.
    pub fn reset(&mut self) {
        self.step = WizardStep::Scene;
        self.scene = None;
        self.style = None;
        self.last_batch = None;
    }

    fn expect_step(&self, expected: WizardStep, action: &'static str) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(self.illegal(action))
        }
    }

    fn illegal(&self, action: &'static str) -> PoseMasterError {
        PoseMasterError::IllegalTransition {
            step: self.step.to_string(),
            action,
        }
    }
}
