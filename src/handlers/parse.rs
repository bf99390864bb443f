use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Json,
};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::handlers::form::{ensure_within_limit, read_file_field};
use crate::models::ParseResponse;
use crate::state::AppState;

/// `POST /api/parse-pdf`: extract a text preview, page count and metadata
/// from the multipart field `file`.
pub async fn parse_pdf_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ParseResponse>> {
    let start = Instant::now();

    info!("Starting PDF parse request");

    let mut multipart = multipart.map_err(|rejection| {
        warn!(rejection = %rejection, "Request is not a multipart form");
        AppError::MissingFile
    })?;

    let max_bytes = state.config.max_file_size_bytes();
    let file = read_file_field(&mut multipart, "file", max_bytes)
        .await?
        .ok_or(AppError::MissingFile)?;

    info!(
        file_name = %file.name,
        file_size = file.size,
        "File extracted from multipart form"
    );

    if !file.is_pdf() {
        warn!(mime_type = ?file.mime_type, "Rejected non-PDF upload");
        return Err(AppError::NotPdf);
    }
    ensure_within_limit(&file, max_bytes)?;

    let result = match state.processor.extract_preview(&file).await {
        Ok(result) => {
            info!(
                text_length = result.text.len(),
                pages = result.pages,
                truncated = result.truncated,
                processing_time_ms = result.processing_time_ms,
                "PDF processing completed successfully"
            );
            result
        }
        Err(e) => {
            error!(error = %e, "PDF processing failed");
            return Err(e);
        }
    };

    info!(
        total_time_ms = start.elapsed().as_millis() as u64,
        "Successfully parsed PDF: {} ({} pages)",
        file.name,
        result.pages
    );

    Ok(Json(ParseResponse::new(result.text, result.pages, result.info)))
}
