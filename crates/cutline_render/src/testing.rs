//! In-process stand-ins for the engine and prober.

use crate::engine::{EngineJob, MediaEngine};
use crate::error::{RenderError, Result};
use crate::probe::MediaProber;
use async_trait::async_trait;
use cutline_core::types::{MediaProbe, MediaSource};
use std::sync::Mutex;

/// Records every job and answers with fixed bytes, or fails.
pub struct FakeEngine {
    output: Option<Vec<u8>>,
    jobs: Mutex<Vec<EngineJob>>,
}

impl FakeEngine {
    pub fn returning(bytes: Vec<u8>) -> Self {
        Self {
            output: Some(bytes),
            jobs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            output: None,
            jobs: Mutex::new(Vec::new()),
        }
    }

    pub fn jobs(&self) -> Vec<EngineJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaEngine for FakeEngine {
    async fn run(&self, job: EngineJob) -> Result<Vec<u8>> {
        self.jobs.lock().unwrap().push(job);
        tokio::task::yield_now().await;
        self.output
            .clone()
            .ok_or_else(|| RenderError::FfmpegFailed("simulated failure".into()))
    }
}

/// Answers every probe with the same result.
pub struct FakeProber {
    probe: Option<MediaProbe>,
    calls: Mutex<Vec<String>>,
}

impl FakeProber {
    pub fn returning(probe: MediaProbe) -> Self {
        Self {
            probe: Some(probe),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            probe: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn probed(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaProber for FakeProber {
    async fn probe(&self, source: &MediaSource) -> Result<MediaProbe> {
        self.calls.lock().unwrap().push(source.name.clone());
        tokio::task::yield_now().await;
        self.probe
            .clone()
            .ok_or_else(|| RenderError::FfprobeFailed("simulated failure".into()))
    }
}
