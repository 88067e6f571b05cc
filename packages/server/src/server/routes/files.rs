//! Output file listing endpoint.
//!
//! GET /api/files/:job_id — derived artifact paths for a completed job.
//! Every path is keyed by the timestamp the pipeline embedded in the
//! script filename; nothing is checked against the filesystem.

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::{not_found, ApiError};
use crate::kernel::jobs::JobStatus;
use crate::server::app::AppState;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilesResponse {
    pub script: String,
    pub studio: String,
    pub audio: String,
    pub video: String,
    pub images: String,
    pub audio_files: String,
}

/// Fixed set of artifact paths the external tool produces for a script.
fn derive_files(timestamp: &str) -> FilesResponse {
    FilesResponse {
        script: format!("/output/script_{timestamp}.json"),
        studio: format!("/output/script_{timestamp}_studio.json"),
        audio: format!("/output/script_{timestamp}.mp3"),
        video: format!("/output/script_{timestamp}.mp4"),
        images: format!("/output/images/script_{timestamp}/"),
        audio_files: format!("/output/audio/script_{timestamp}/"),
    }
}

pub async fn files_handler(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<FilesResponse>, ApiError> {
    let record = state.deps.jobs.get(job_id).await;

    match record {
        Some(record) if record.status == JobStatus::Completed => {
            let result = record
                .result
                .ok_or_else(|| not_found("files not found"))?;
            Ok(Json(derive_files(&result.timestamp)))
        }
        _ => Err(not_found("files not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_the_full_artifact_set_from_one_timestamp() {
        let files = derive_files("2025-01-01T00-00-00-000Z");
        assert_eq!(files.script, "/output/script_2025-01-01T00-00-00-000Z.json");
        assert_eq!(
            files.studio,
            "/output/script_2025-01-01T00-00-00-000Z_studio.json"
        );
        assert_eq!(files.audio, "/output/script_2025-01-01T00-00-00-000Z.mp3");
        assert_eq!(files.video, "/output/script_2025-01-01T00-00-00-000Z.mp4");
        assert_eq!(
            files.images,
            "/output/images/script_2025-01-01T00-00-00-000Z/"
        );
        assert_eq!(
            files.audio_files,
            "/output/audio/script_2025-01-01T00-00-00-000Z/"
        );
    }

    #[test]
    fn audio_files_field_serializes_camel_case() {
        let json = serde_json::to_value(derive_files("ts")).unwrap();
        assert!(json.get("audioFiles").is_some());
    }
}
