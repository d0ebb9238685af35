//! Photo shoot use case.
//!
//! `PhotoShootUseCase` owns one user's wizard session and the history of
//! batches produced during it, and drives the orchestrator when a style is
//! chosen.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use posemaster_core::error::{PoseMasterError, Result};
use posemaster_core::generation::GenerationBatch;
use posemaster_core::history::SessionHistory;
use posemaster_core::selection::{SceneSelection, StyleSelection};
use posemaster_core::wizard::{GenerationRequest, WizardSession, WizardStep};
use tokio::sync::RwLock;

use crate::orchestrator::PhotoGuideOrchestrator;

/// Use case for one wizard run and its history.
///
/// # Thread Safety
///
/// Session and history sit behind `Arc<RwLock<_>>` and are only mutated here.
/// The session lock is never held across the orchestration call.
///
/// # Background generation
///
/// A generation started by [`select_style`](Self::select_style) runs in its
/// own task and records its outcome even if the caller stops waiting.
pub struct PhotoShootUseCase {
    session: Arc<RwLock<WizardSession>>,
    history: Arc<RwLock<SessionHistory>>,
    orchestrator: Arc<PhotoGuideOrchestrator>,
    generation_in_flight: Arc<AtomicBool>,
}

/// Clears the in-flight flag when the generation task finishes.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(Arc::clone(flag)))
            .map_err(|_| PoseMasterError::GenerationInFlight)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PhotoShootUseCase {
    pub fn new(orchestrator: Arc<PhotoGuideOrchestrator>) -> Self {
        Self {
            session: Arc::new(RwLock::new(WizardSession::new())),
            history: Arc::new(RwLock::new(SessionHistory::new())),
            orchestrator,
            generation_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn step(&self) -> WizardStep {
        self.session.read().await.step()
    }

    /// Returns a snapshot of the current session.
    pub async fn session(&self) -> WizardSession {
        self.session.read().await.clone()
    }

    /// Returns a snapshot of the history.
    pub async fn history(&self) -> SessionHistory {
        self.history.read().await.clone()
    }

    pub fn is_generating(&self) -> bool {
        self.generation_in_flight.load(Ordering::Acquire)
    }

    pub async fn select_scene(&self, scene: SceneSelection) -> Result<()> {
        tracing::debug!(scene_id = %scene.id, "Scene selected");
        self.session.write().await.select_scene(scene)
    }

    pub async fn back_to_scene(&self) -> Result<()> {
        self.session.write().await.back_to_scene()
    }

    /// Returns to the first step. History is kept.
    pub async fn reset(&self) {
        self.session.write().await.reset();
    }

    /// Stores the style and generates the batch for the current scene.
    ///
    /// On success the batch is recorded in the session and appended to the
    /// history. On any orchestration failure the session resets to `Scene`
    /// and the error is returned. Fails with `GenerationInFlight` if another
    /// generation is still running.
    ///
    /// Dropping the returned future does not cancel the generation.
    pub async fn select_style(&self, style: StyleSelection) -> Result<GenerationBatch> {
        let guard = InFlightGuard::acquire(&self.generation_in_flight)?;

        let request = self.session.write().await.select_style(style)?;
        tracing::info!(
            scene_id = %request.scene.id,
            style_id = %request.style.id,
            "Starting generation"
        );

        let task = GenerationTask {
            session: Arc::clone(&self.session),
            history: Arc::clone(&self.history),
            orchestrator: Arc::clone(&self.orchestrator),
            request,
        };

        tokio::spawn(async move {
            let outcome = task.run().await;
            drop(guard);
            outcome
        })
        .await
        .map_err(|err| PoseMasterError::internal(format!("Generation task did not complete: {err}")))?
    }
}

/// Everything a detached generation needs to finish on its own.
struct GenerationTask {
    session: Arc<RwLock<WizardSession>>,
    history: Arc<RwLock<SessionHistory>>,
    orchestrator: Arc<PhotoGuideOrchestrator>,
    request: GenerationRequest,
}

impl GenerationTask {
    async fn run(self) -> Result<GenerationBatch> {
        let Self {
            session,
            history,
            orchestrator,
            request,
        } = self;

        let outcome = orchestrator
            .generate(
                &request.scene.image,
                &request.scene.description,
                request.style.head_count,
                &request.style.description,
            )
            .await;

        let mut session = session.write().await;
        match outcome {
            Ok(batch) => {
                let entry = session
                    .complete_generation(&request, batch.clone())
                    .inspect_err(|_| {
                        tracing::warn!(batch_id = batch.id(), "Session moved on, discarding batch");
                    })?;
                // Appended while the session lock is held so history order
                // matches completion order.
                history.write().await.append(entry);
                Ok(batch)
            }
            Err(err) => {
                if session.fail_generation(&request) {
                    tracing::warn!("Generation failed, session reset: {err}");
                }
                Err(err)
            }
        }
    }
}
