//! In-memory job registry.
//!
//! A shared map behind a tokio `RwLock`. Records are ephemeral artifacts of
//! a single process run; nothing survives a restart. The store performs no
//! validation — each record has exactly one writer, its runner task.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::record::{JobRecord, JobSpec, JobUpdate};

/// Registry mapping job ids to records.
///
/// Thread-safe, cloneable. All clones share the same map.
#[derive(Clone, Default)]
pub struct JobStore {
    records: Arc<RwLock<HashMap<Uuid, JobRecord>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh pending record and return it. Never fails; ids are
    /// random v4 UUIDs and are never reused.
    pub async fn create(&self, spec: JobSpec) -> JobRecord {
        let record = JobRecord::new(spec);
        let mut records = self.records.write().await;
        records.insert(record.id, record.clone());
        record
    }

    /// Read-only lookup.
    pub async fn get(&self, id: Uuid) -> Option<JobRecord> {
        let records = self.records.read().await;
        records.get(&id).cloned()
    }

    /// Merge partial fields into an existing record, refreshing its
    /// `updated_at`. Returns the updated record, or `None` if the job was
    /// already swept — a silent no-op, not an error.
    pub async fn update(&self, id: Uuid, update: JobUpdate) -> Option<JobRecord> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id)?;
        update.apply(record);
        Some(record.clone())
    }

    /// Remove every record older than `max_age`, regardless of status.
    /// Returns the number of records removed.
    pub async fn sweep(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| record.created_at > cutoff);
        before - records.len()
    }

    /// Number of live records (health endpoint).
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}
