//! Shared server dependencies.
//!
//! One instance is built at startup and handed to the HTTP layer and every
//! runner task. Holding the registry here (rather than in a global) keeps
//! the single-writer-per-key semantics while making the wiring explicit.

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::kernel::jobs::JobStore;
use crate::kernel::pipeline::{ContentGenerator, MulmoPipeline};
use crate::kernel::progress_hub::ProgressHub;

pub struct ServerDeps {
    /// The job registry — the only shared mutable structure in the process.
    pub jobs: JobStore,
    /// Per-job broadcast channels feeding the SSE progress endpoint.
    pub progress: ProgressHub,
    /// The content pipeline behind a trait seam so tests can inject a stub.
    pub generator: Arc<dyn ContentGenerator>,
}

impl ServerDeps {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            jobs: JobStore::new(),
            progress: ProgressHub::new(),
            generator,
        }
    }

    /// Production wiring: the real pipeline built from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let pipeline = MulmoPipeline::from_config(config)?;
        Ok(Self::new(Arc::new(pipeline)))
    }
}
