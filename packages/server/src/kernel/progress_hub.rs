//! Per-job pub/sub hub for progress streaming.
//!
//! The runner publishes a full [`JobRecord`] snapshot after every registry
//! update; the SSE endpoint subscribes. Subscribers come and go
//! independently of pipeline execution.
//!
//! # Usage
//!
//! Producer (job runner):
//!   hub.publish(job_id, record).await;
//!
//! Consumer (SSE endpoint):
//!   let rx = hub.subscribe(job_id).await;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::kernel::jobs::JobRecord;

/// In-process broadcast hub keyed by job id.
///
/// Thread-safe, cloneable. A job's channel holds the last 64 snapshots —
/// far more than the pipeline's dozen checkpoints ever produce.
#[derive(Clone)]
pub struct ProgressHub {
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<JobRecord>>>>,
    capacity: usize,
}

impl ProgressHub {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Publish a snapshot for a job. No-op if nobody is subscribed.
    pub async fn publish(&self, job_id: Uuid, record: JobRecord) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(&job_id) {
            // Ignore send errors (no active receivers)
            let _ = tx.send(record);
        }
    }

    /// Subscribe to a job's snapshots. Creates the channel if needed.
    pub async fn subscribe(&self, job_id: Uuid) -> broadcast::Receiver<JobRecord> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(job_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        tx.subscribe()
    }

    /// Drop channels with zero subscribers. Called from the hourly sweep so
    /// the map does not grow for the life of the process.
    pub async fn cleanup(&self) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, tx| tx.receiver_count() > 0);
    }

    /// Number of live channels.
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

impl Default for ProgressHub {
    fn default() -> Self {
        Self::new()
    }
}
