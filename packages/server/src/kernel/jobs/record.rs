//! Job record model.
//!
//! Serialized in camelCase: records go straight onto the wire for the
//! status endpoint and the progress stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

// ============================================================================
// Job model
// ============================================================================

/// What the client asked for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    pub url: String,
    pub style: String,
    pub subtitles: bool,
}

/// Where the pipeline left its artifacts, set only on completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub script_path: String,
    pub output_dir: String,
    /// Timestamp embedded in every output filename.
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: Uuid,
    pub url: String,
    pub style: String,
    pub subtitles: bool,
    pub status: JobStatus,
    /// Advisory checkpoint, 0-100. Fixed constants per stage, not a real
    /// completion ratio.
    pub progress: u8,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub result: Option<GenerationResult>,
    pub error: Option<String>,
}

impl JobRecord {
    pub fn new(spec: JobSpec) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            url: spec.url,
            style: spec.style,
            subtitles: spec.subtitles,
            status: JobStatus::Pending,
            progress: 0,
            message: "Job accepted".to_string(),
            created_at: now,
            updated_at: now,
            result: None,
            error: None,
        }
    }
}

// ============================================================================
// Partial update
// ============================================================================

/// Field-wise merge applied by [`super::JobStore::update`]. The store trusts
/// its single writer and performs no validation.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub progress: Option<u8>,
    pub message: Option<String>,
    pub result: Option<GenerationResult>,
    pub error: Option<String>,
}

impl JobUpdate {
    /// Stage checkpoint while the job is running.
    pub fn progress(progress: u8, message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Processing),
            progress: Some(progress),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn completed(result: GenerationResult) -> Self {
        Self {
            status: Some(JobStatus::Completed),
            progress: Some(100),
            message: Some("Content generation complete".to_string()),
            result: Some(result),
            ..Default::default()
        }
    }

    /// Failure resets progress to 0 and records the error text.
    pub fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            status: Some(JobStatus::Failed),
            progress: Some(0),
            message: Some(format!("Error: {error}")),
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn apply(self, record: &mut JobRecord) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(progress) = self.progress {
            record.progress = progress;
        }
        if let Some(message) = self.message {
            record.message = message;
        }
        if let Some(result) = self.result {
            record.result = Some(result);
        }
        if let Some(error) = self.error {
            record.error = Some(error);
        }
        record.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> JobRecord {
        JobRecord::new(JobSpec {
            url: "https://example.com".to_string(),
            style: "ghibli".to_string(),
            subtitles: false,
        })
    }

    fn sample_result() -> GenerationResult {
        GenerationResult {
            script_path: "output/script_x.json".to_string(),
            output_dir: "./output".to_string(),
            timestamp: "x".to_string(),
        }
    }

    #[test]
    fn new_record_starts_pending_at_zero() {
        let record = sample_record();
        assert_eq!(record.status, JobStatus::Pending);
        assert_eq!(record.progress, 0);
        assert!(record.result.is_none());
        assert!(record.error.is_none());
    }

    #[test]
    fn terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn completed_update_sets_result_and_full_progress() {
        let mut record = sample_record();
        JobUpdate::completed(sample_result()).apply(&mut record);
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.progress, 100);
        assert!(record.result.is_some());
        assert!(record.error.is_none());
    }

    #[test]
    fn failed_update_resets_progress_and_sets_error() {
        let mut record = sample_record();
        JobUpdate::progress(50, "Generating audio").apply(&mut record);
        JobUpdate::failed("mulmo exploded").apply(&mut record);
        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(record.progress, 0);
        assert_eq!(record.error.as_deref(), Some("mulmo exploded"));
        assert!(record.result.is_none());
    }

    #[test]
    fn partial_update_leaves_other_fields_alone() {
        let mut record = sample_record();
        let created = record.created_at;
        JobUpdate::progress(20, "Extracting page text").apply(&mut record);
        assert_eq!(record.url, "https://example.com");
        assert_eq!(record.created_at, created);
        assert_eq!(record.message, "Extracting page text");
    }

    #[test]
    fn record_serializes_camel_case_with_lowercase_status() {
        let record = sample_record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "pending");
        assert!(json.get("createdAt").is_some());
        assert!(json["result"].is_null());
    }
}
