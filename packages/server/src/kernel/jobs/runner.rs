//! Job runner: drives the content pipeline for one job and owns every write
//! to that job's record.
//!
//! State machine per job: `pending → processing → {completed | failed}`.
//! Terminal states are final. There is no retry, no rollback of partial
//! media files, and no cancellation — once launched a job runs until the
//! pipeline returns or fails.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use super::record::{JobSpec, JobUpdate};
use crate::kernel::deps::ServerDeps;
use crate::kernel::pipeline::Progress;

/// Launch a job on a detached task. The task never propagates an error:
/// any pipeline failure is converted into a terminal `failed` record.
pub fn spawn_job(deps: Arc<ServerDeps>, job_id: Uuid, spec: JobSpec) {
    tokio::spawn(async move {
        run_job(deps, job_id, spec).await;
    });
}

/// Execute one job to a terminal state.
pub async fn run_job(deps: Arc<ServerDeps>, job_id: Uuid, spec: JobSpec) {
    info!(job_id = %job_id, url = %spec.url, "job starting");

    apply(&deps, job_id, JobUpdate::progress(10, "Fetching content from URL")).await;

    let progress = JobProgress {
        deps: deps.clone(),
        job_id,
    };

    match deps.generator.generate(&spec, &progress).await {
        Ok(result) => {
            info!(job_id = %job_id, script = %result.script_path, "job completed");
            apply(&deps, job_id, JobUpdate::completed(result)).await;
        }
        Err(error) => {
            // {:#} keeps the context chain, so captured tool output from a
            // failed mulmo invocation lands in the record.
            let message = format!("{error:#}");
            warn!(job_id = %job_id, error = %message, "job failed");
            apply(&deps, job_id, JobUpdate::failed(message)).await;
        }
    }
}

/// Write an update into the registry and mirror the new snapshot to the
/// progress hub. If the record was swept mid-flight the update is lost
/// silently and nothing is published.
async fn apply(deps: &ServerDeps, job_id: Uuid, update: JobUpdate) {
    if let Some(record) = deps.jobs.update(job_id, update).await {
        deps.progress.publish(job_id, record).await;
    }
}

/// Checkpoint reporter handed to the pipeline: each stage boundary becomes
/// a registry update plus a broadcast to stream subscribers.
struct JobProgress {
    deps: Arc<ServerDeps>,
    job_id: Uuid,
}

#[async_trait]
impl Progress for JobProgress {
    async fn checkpoint(&self, progress: u8, message: &str) {
        apply(&self.deps, self.job_id, JobUpdate::progress(progress, message)).await;
    }
}
