#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use posemaster_application::PhotoGuideOrchestrator;
use posemaster_core::catalog::{CompositionArchetype, CompositionCatalog};
use posemaster_core::error::{PoseMasterError, Result};
use posemaster_core::generation::GenerationGateway;
use posemaster_core::image_ref::{EmbeddedImage, RemoteImage, RemoteImageFetcher};
use tokio::sync::{Barrier, Semaphore};

/// Archetype labelled with its own key, so both of its prompts can be
/// attributed back to it.
pub fn archetype(key: &str) -> CompositionArchetype {
    CompositionArchetype::new(key, key, image_marker(key))
}

fn image_marker(key: &str) -> String {
    format!("Frame it as {key}.")
}

fn advice_marker(key: &str) -> String {
    format!("「{key}」")
}

pub fn catalog(keys: &[&str]) -> CompositionCatalog {
    CompositionCatalog::new(keys.iter().map(|key| archetype(key)).collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallKind {
    Image,
    Text,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub archetype: String,
    pub prompt: String,
    pub reference: Option<EmbeddedImage>,
}

/// In-memory gateway scripted per archetype key.
///
/// Every prompt is attributed to the archetype whose marker it contains.
/// Images are returned with the key as their bytes so pairing can be checked.
#[derive(Default)]
pub struct ScriptedGateway {
    keys: Vec<String>,
    failing_images: HashSet<String>,
    failing_advice: HashSet<String>,
    blank_advice: HashSet<String>,
    delays: HashMap<String, Duration>,
    missing_credential: bool,
    barrier: Option<Arc<Barrier>>,
    gate: Option<Arc<Semaphore>>,
    calls: Mutex<Vec<RecordedCall>>,
    started: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new(keys: &[&str]) -> Self {
        Self {
            keys: keys.iter().map(|key| key.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn fail_image(mut self, key: &str) -> Self {
        self.failing_images.insert(key.to_string());
        self
    }

    pub fn fail_advice(mut self, key: &str) -> Self {
        self.failing_advice.insert(key.to_string());
        self
    }

    pub fn blank_advice(mut self, key: &str) -> Self {
        self.blank_advice.insert(key.to_string());
        self
    }

    pub fn delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub fn without_credential(mut self) -> Self {
        self.missing_credential = true;
        self
    }

    /// Every call waits on `barrier` before answering.
    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    /// Every call waits for a permit on `gate` before answering.
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, key: &str, kind: CallKind) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.archetype == key && call.kind == kind)
            .collect()
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    fn attribute(&self, kind: &CallKind, prompt: &str) -> String {
        self.keys
            .iter()
            .find(|key| {
                let marker = match kind {
                    CallKind::Image => image_marker(key),
                    CallKind::Text => advice_marker(key),
                };
                prompt.contains(&marker)
            })
            .cloned()
            .unwrap_or_default()
    }

    async fn enter(
        &self,
        kind: CallKind,
        prompt: &str,
        reference: Option<&EmbeddedImage>,
    ) -> String {
        let key = self.attribute(&kind, prompt);
        self.started.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(RecordedCall {
            kind,
            archetype: key.clone(),
            prompt: prompt.to_string(),
            reference: reference.cloned(),
        });

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.unwrap();
        }
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        key
    }
}

#[async_trait]
impl GenerationGateway for ScriptedGateway {
    async fn preflight(&self) -> Result<()> {
        if self.missing_credential {
            return Err(PoseMasterError::config("Gemini API key not found"));
        }
        Ok(())
    }

    async fn generate_image(
        &self,
        prompt: &str,
        reference: Option<&EmbeddedImage>,
    ) -> Result<EmbeddedImage> {
        let key = self.enter(CallKind::Image, prompt, reference).await;
        if self.failing_images.contains(&key) {
            return Err(PoseMasterError::NoImageProduced);
        }
        Ok(EmbeddedImage::new("image/png", key.into_bytes()))
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let key = self.enter(CallKind::Text, prompt, None).await;
        if self.failing_advice.contains(&key) {
            return Err(PoseMasterError::upstream(Some(503), "UNAVAILABLE: overloaded"));
        }
        if self.blank_advice.contains(&key) {
            return Ok("   ".to_string());
        }
        Ok(format!("advice for {key}"))
    }
}

/// Fetcher that counts calls and answers with a fixed JPEG payload.
#[derive(Default)]
pub struct CountingFetcher {
    pub fetches: AtomicUsize,
    pub fail: bool,
}

impl CountingFetcher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

pub const SCENE_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

#[async_trait]
impl RemoteImageFetcher for CountingFetcher {
    async fn fetch(&self, remote: &RemoteImage) -> Result<EmbeddedImage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PoseMasterError::source_unavailable(remote.url(), "404 Not Found"));
        }
        Ok(EmbeddedImage::new("image/jpeg", SCENE_BYTES.to_vec()))
    }
}

pub fn orchestrator(
    gateway: Arc<ScriptedGateway>,
    fetcher: Arc<CountingFetcher>,
    keys: &[&str],
) -> PhotoGuideOrchestrator {
    PhotoGuideOrchestrator::new(gateway, fetcher).with_catalog(catalog(keys))
}
