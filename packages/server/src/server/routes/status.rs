//! Job status polling endpoint.
//!
//! GET /api/status/:job_id — the full record as JSON, or 404 once the job
//! is unknown (never submitted, or already swept).

use axum::{
    extract::{Extension, Path},
    Json,
};
use uuid::Uuid;

use super::{not_found, ApiError};
use crate::kernel::jobs::JobRecord;
use crate::server::app::AppState;

pub async fn status_handler(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobRecord>, ApiError> {
    state
        .deps
        .jobs
        .get(job_id)
        .await
        .map(Json)
        .ok_or_else(|| not_found("job not found"))
}
