//! Periodic cleanup of stale job records and idle progress channels.
//!
//! Runs on its own cron schedule, independent of request traffic. Both the
//! interval and the retention window are fixed constants. The sweep does
//! not coordinate with in-flight runners: a record deleted mid-flight makes
//! the runner's final update a silent no-op.

use anyhow::Result;
use chrono::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use super::store::JobStore;
use crate::kernel::progress_hub::ProgressHub;

/// Records older than this are deleted regardless of status.
pub const RETENTION_HOURS: i64 = 24;

/// Start the hourly sweep. The returned scheduler must be kept alive for
/// the lifetime of the server.
pub async fn start_sweeper(store: JobStore, hub: ProgressHub) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let sweep_store = store.clone();
    let sweep_hub = hub.clone();
    let sweep_job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let store = sweep_store.clone();
        let hub = sweep_hub.clone();
        Box::pin(async move {
            sweep_once(&store, &hub).await;
        })
    })?;

    scheduler.add(sweep_job).await?;
    scheduler.start().await?;

    info!(
        retention_hours = RETENTION_HOURS,
        "job sweep scheduled (hourly)"
    );
    Ok(scheduler)
}

/// One sweep pass: expired records out of the registry, subscriber-less
/// channels out of the hub.
async fn sweep_once(store: &JobStore, hub: &ProgressHub) {
    let removed = store.sweep(Duration::hours(RETENTION_HOURS)).await;
    if removed > 0 {
        info!(removed, "swept expired job records");
    }
    hub.cleanup().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::jobs::JobSpec;

    fn spec() -> JobSpec {
        JobSpec {
            url: "https://example.com".to_string(),
            style: "ghibli".to_string(),
            subtitles: false,
        }
    }

    #[tokio::test]
    async fn sweep_pass_reaps_idle_progress_channels() {
        let store = JobStore::new();
        let hub = ProgressHub::new();
        let record = store.create(spec()).await;

        let rx = hub.subscribe(record.id).await;
        assert_eq!(hub.channel_count().await, 1);

        drop(rx);
        sweep_once(&store, &hub).await;

        assert_eq!(hub.channel_count().await, 0);
        // The record itself is young and stays.
        assert!(store.get(record.id).await.is_some());
    }

    #[tokio::test]
    async fn sweep_pass_keeps_channels_with_live_subscribers() {
        let store = JobStore::new();
        let hub = ProgressHub::new();
        let record = store.create(spec()).await;

        let _rx = hub.subscribe(record.id).await;
        sweep_once(&store, &hub).await;

        assert_eq!(hub.channel_count().await, 1);
    }
}
