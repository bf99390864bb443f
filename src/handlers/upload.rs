use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::handlers::form::{describe, read_file_fields, ReceivedFile};
use crate::models::UploadResponse;
use crate::state::AppState;

/// `POST /api/upload`: accept repeated `files` parts and list the PDFs among
/// them that fit the per-file limit. Nothing is stored.
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!(rejection = %rejection, "Upload is not a multipart form");
        AppError::MissingFiles
    })?;

    let max_bytes = state.config.max_file_size_bytes();
    let received = read_file_fields(
        &mut multipart,
        "files",
        max_bytes,
        state.config.upload_body_limit_bytes(),
    )
    .await?;
    if received.is_empty() {
        return Err(AppError::MissingFiles);
    }

    let files: Vec<_> = received
        .iter()
        .filter_map(|file| match file {
            ReceivedFile::Accepted(upload) if upload.is_pdf() => Some(describe(upload)),
            ReceivedFile::Accepted(upload) => {
                warn!(
                    file_name = %upload.name,
                    mime_type = ?upload.mime_type,
                    "Skipping upload that is not a PDF"
                );
                None
            }
            ReceivedFile::Oversized { name, size } => {
                warn!(
                    file_name = %name,
                    file_size = *size,
                    max_size = max_bytes,
                    "Skipping upload over the size limit"
                );
                None
            }
        })
        .collect();

    if files.is_empty() {
        return Err(AppError::NoValidPdf);
    }

    info!(received = received.len(), accepted = files.len(), "Files uploaded");
    Ok(Json(UploadResponse::new(files)))
}

/// `GET /api/upload`
pub async fn upload_info_handler() -> Json<Value> {
    Json(json!({
        "message": "Upload API endpoint",
        "methods": ["POST"],
        "description": "Upload PDF files to the server"
    }))
}
