use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::routes::quiz::submitted_result;
use crate::services::export_service::ExportService;
use crate::utils::time::{export_timestamp, file_stamp, now};
use crate::AppState;

fn attachment(content_type: &str, filename: String, body: Vec<u8>) -> impl IntoResponse {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
}

/// Results summary table as CSV
pub async fn export_csv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = submitted_result(&state, id)?;
    let buffer = ExportService::results_csv(&result)?;
    let filename = format!("quiz_results_{}.csv", file_stamp(now()));
    Ok(attachment("text/csv; charset=utf-8", filename, buffer))
}

/// Detailed results with metadata as JSON
pub async fn export_json(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = submitted_result(&state, id)?;
    let json = ExportService::results_json(&result, export_timestamp())?;
    let filename = format!("quiz_results_detailed_{}.json", file_stamp(now()));
    Ok(attachment("application/json", filename, json.into_bytes()))
}

/// Question sheet with answers and explanations as plain text
pub async fn export_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let session = state.sessions.get(id)?;
    if !session.is_generated() {
        return Err(Error::Conflict("No quiz has been generated yet".to_string()));
    }
    let text = ExportService::questions_text(session.questions());
    let filename = format!("quiz_{}.txt", file_stamp(now()));
    Ok(attachment("text/plain; charset=utf-8", filename, text.into_bytes()))
}
