//! SSE progress stream.
//!
//! GET /api/progress/:job_id
//!
//! Pushes the current record immediately, then every snapshot the runner
//! publishes, and closes exactly once after the first terminal record.
//! A dropped connection drops the stream and its hub subscription.

use std::convert::Infallible;

use axum::{
    extract::{Extension, Path},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{not_found, ApiError};
use crate::kernel::jobs::{JobRecord, JobStore};
use crate::server::app::AppState;

pub async fn progress_handler(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    // Subscribe before reading the snapshot: a terminal record published
    // in between lands in the channel instead of being dropped for lack of
    // subscribers, so the stream still sees it and closes.
    let rx = state.deps.progress.subscribe(job_id).await;

    let snapshot = state
        .deps
        .jobs
        .get(job_id)
        .await
        .ok_or_else(|| not_found("job not found"))?;

    let records = record_stream(snapshot, rx, state.deps.jobs.clone(), job_id);

    let events = records.map(|record| {
        let event = Event::default()
            .json_data(&record)
            .unwrap_or_else(|_| Event::default().data("{}"));
        Ok::<_, Infallible>(event)
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

struct StreamState {
    rx: broadcast::Receiver<JobRecord>,
    store: JobStore,
    job_id: Uuid,
    pending: Option<JobRecord>,
    done: bool,
}

/// Record stream backing the SSE response: initial snapshot first, then
/// hub broadcasts, ending after the first terminal record. A lagged
/// receiver falls back to the registry's current snapshot.
fn record_stream(
    snapshot: JobRecord,
    rx: broadcast::Receiver<JobRecord>,
    store: JobStore,
    job_id: Uuid,
) -> impl Stream<Item = JobRecord> {
    let state = StreamState {
        rx,
        store,
        job_id,
        pending: Some(snapshot),
        done: false,
    };

    futures::stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }

        if let Some(record) = state.pending.take() {
            state.done = record.status.is_terminal();
            return Some((record, state));
        }

        match state.rx.recv().await {
            Ok(record) => {
                state.done = record.status.is_terminal();
                Some((record, state))
            }
            Err(broadcast::error::RecvError::Lagged(_)) => {
                // Missed snapshots; re-read the registry. Gone means swept.
                let record = state.store.get(state.job_id).await?;
                state.done = record.status.is_terminal();
                Some((record, state))
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::kernel::jobs::{run_job, JobSpec, JobStatus};
    use crate::kernel::testing::StubGenerator;
    use crate::kernel::ServerDeps;

    fn spec() -> JobSpec {
        JobSpec {
            url: "https://example.com".to_string(),
            style: "ghibli".to_string(),
            subtitles: false,
        }
    }

    async fn collect_stream(deps: Arc<ServerDeps>) -> Vec<JobRecord> {
        let record = deps.jobs.create(spec()).await;
        let rx = deps.progress.subscribe(record.id).await;
        let stream = record_stream(record.clone(), rx, deps.jobs.clone(), record.id);

        let runner_deps = deps.clone();
        let job_id = record.id;
        tokio::spawn(async move {
            run_job(runner_deps, job_id, spec()).await;
        });

        tokio::time::timeout(Duration::from_secs(5), stream.collect::<Vec<_>>())
            .await
            .expect("stream should close after the terminal record")
    }

    #[tokio::test]
    async fn streams_processing_records_then_closes_on_terminal() {
        let deps = Arc::new(ServerDeps::new(Arc::new(StubGenerator::succeeding())));
        let records = collect_stream(deps).await;

        assert!(
            records
                .iter()
                .any(|r| r.status == JobStatus::Processing),
            "expected at least one processing record before the terminal one"
        );

        let last = records.last().unwrap();
        assert_eq!(last.status, JobStatus::Completed);
        assert_eq!(last.progress, 100);

        // The terminal record is the only terminal record — the stream
        // closed right after it.
        let terminal_count = records.iter().filter(|r| r.status.is_terminal()).count();
        assert_eq!(terminal_count, 1);
    }

    #[tokio::test]
    async fn failed_job_terminates_the_stream_with_the_error_record() {
        let deps = Arc::new(ServerDeps::new(Arc::new(StubGenerator::failing("boom"))));
        let records = collect_stream(deps).await;

        let last = records.last().unwrap();
        assert_eq!(last.status, JobStatus::Failed);
        assert!(last.error.as_deref().unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn terminal_record_after_the_snapshot_still_closes_the_stream() {
        let deps = Arc::new(ServerDeps::new(Arc::new(StubGenerator::succeeding())));
        let record = deps.jobs.create(spec()).await;

        // Handler order: subscribe first, then snapshot. The job then runs
        // to completion before the stream is consumed; the terminal record
        // sits buffered in the already-registered channel.
        let rx = deps.progress.subscribe(record.id).await;
        let snapshot = deps.jobs.get(record.id).await.unwrap();
        assert_eq!(snapshot.status, JobStatus::Pending);

        run_job(deps.clone(), record.id, spec()).await;

        let stream = record_stream(snapshot, rx, deps.jobs.clone(), record.id);
        let records = tokio::time::timeout(Duration::from_secs(2), stream.collect::<Vec<_>>())
            .await
            .expect("stream should close after the terminal record");

        assert_eq!(records.first().unwrap().status, JobStatus::Pending);
        assert_eq!(records.last().unwrap().status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn already_terminal_job_yields_one_record_and_closes() {
        let deps = Arc::new(ServerDeps::new(Arc::new(StubGenerator::succeeding())));
        let record = deps.jobs.create(spec()).await;
        run_job(deps.clone(), record.id, spec()).await;

        let snapshot = deps.jobs.get(record.id).await.unwrap();
        let rx = deps.progress.subscribe(record.id).await;
        let stream = record_stream(snapshot, rx, deps.jobs.clone(), record.id);

        let records: Vec<_> = stream.collect().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, JobStatus::Completed);
    }
}
