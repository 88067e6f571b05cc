//! Test doubles for the content pipeline.
//!
//! Lets runner and router tests run without network access, an API key, or
//! the external tool installed.

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::kernel::jobs::{GenerationResult, JobSpec};
use crate::kernel::pipeline::{ContentGenerator, Progress};

/// A scripted generator: emits a couple of realistic checkpoints, then
/// succeeds with a fixed result or fails with a fixed message.
pub struct StubGenerator {
    outcome: StubOutcome,
}

enum StubOutcome {
    Succeed(GenerationResult),
    Fail(String),
}

impl StubGenerator {
    pub fn succeeding() -> Self {
        Self {
            outcome: StubOutcome::Succeed(sample_result()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: StubOutcome::Fail(message.into()),
        }
    }
}

/// The result a successful stub run reports.
pub fn sample_result() -> GenerationResult {
    GenerationResult {
        script_path: "output/script_2025-01-01T00-00-00-000Z.json".to_string(),
        output_dir: "./output".to_string(),
        timestamp: "2025-01-01T00-00-00-000Z".to_string(),
    }
}

#[async_trait]
impl ContentGenerator for StubGenerator {
    async fn generate(
        &self,
        _spec: &JobSpec,
        progress: &dyn Progress,
    ) -> Result<GenerationResult> {
        progress.checkpoint(30, "Generating MulmoScript").await;
        progress.checkpoint(90, "Generating video").await;

        match &self.outcome {
            StubOutcome::Succeed(result) => Ok(result.clone()),
            StubOutcome::Fail(message) => Err(anyhow!("{message}")),
        }
    }
}
