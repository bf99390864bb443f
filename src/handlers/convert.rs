use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Json,
};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::handlers::form::{ensure_within_limit, read_file_field};
use crate::models::ConvertResponse;
use crate::state::AppState;

/// `POST /api/convert-pdf-to-doc`: extract the PDF in field `file` and have
/// the language model restructure it as a Word document.
pub async fn convert_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ConvertResponse>> {
    let start = Instant::now();

    let mut multipart = multipart.map_err(|rejection| {
        warn!(rejection = %rejection, "Request is not a multipart form");
        AppError::MissingFile
    })?;

    let max_bytes = state.config.max_file_size_bytes();
    let file = read_file_field(&mut multipart, "file", max_bytes)
        .await?
        .ok_or(AppError::MissingFile)?;

    if !file.is_pdf() {
        return Err(AppError::NotPdf);
    }
    ensure_within_limit(&file, max_bytes)?;

    let converter = state.converter().ok_or(AppError::ApiKeyNotConfigured)?;

    info!(
        file_name = %file.name,
        file_size = file.size,
        "Converting PDF to DOC"
    );

    let doc_content = match converter.convert(&file).await {
        Ok(doc) => doc,
        Err(e) => {
            error!(error = %e, "PDF to DOC conversion failed");
            return Err(e);
        }
    };

    info!(
        total_time_ms = start.elapsed().as_millis() as u64,
        content_length = doc_content.content.len(),
        "Successfully converted PDF to DOC: {}",
        file.name
    );

    Ok(Json(ConvertResponse::new(doc_content)))
}
