//! Job submission endpoint.
//!
//! POST /api/generate
//!
//! Validates the URL synchronously, creates a pending record, launches the
//! runner without awaiting it, and answers with the job id immediately.

use axum::{extract::Extension, Json};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{bad_request, ApiError};
use crate::kernel::jobs::{self, JobSpec};
use crate::server::app::AppState;

lazy_static! {
    static ref URL_PATTERN: Regex =
        Regex::new(r"^https?://.+").expect("static pattern compiles");
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub url: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub subtitles: bool,
}

fn default_style() -> String {
    "ghibli".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub job_id: Uuid,
    pub message: String,
    pub status_url: String,
}

pub async fn generate_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if !URL_PATTERN.is_match(&request.url) {
        return Err(bad_request("a valid http(s) URL is required"));
    }

    let spec = JobSpec {
        url: request.url,
        style: request.style,
        subtitles: request.subtitles,
    };

    let record = state.deps.jobs.create(spec.clone()).await;
    jobs::spawn_job(state.deps.clone(), record.id, spec);

    info!(job_id = %record.id, url = %record.url, style = %record.style, "job submitted");

    Ok(Json(GenerateResponse {
        job_id: record.id,
        message: "Job started".to_string(),
        status_url: format!("/api/status/{}", record.id),
    }))
}
