//! Reading file parts out of multipart requests.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::models::{PdfUpload, UploadedFile};

const DEFAULT_FILE_NAME: &str = "document.pdf";

// What the multipart parser reports for a body that ends before the first
// boundary, which is what an empty form posted as multipart looks like.
const EMPTY_STREAM: &str = "incomplete multipart stream";

/// A file part of a multi-file form.
#[derive(Debug)]
pub enum ReceivedFile {
    Accepted(PdfUpload),
    /// Over the per-file limit. Its bytes were read and discarded.
    Oversized { name: String, size: usize },
}

/// Read the first part named `field_name`. Other parts are drained and
/// ignored. Returns `None` when no such part exists.
pub async fn read_file_field(
    multipart: &mut Multipart,
    field_name: &str,
    max_bytes: usize,
) -> AppResult<Option<PdfUpload>> {
    let to_app_error = |e: MultipartError| {
        multipart_error(e, AppError::FileTooLarge {
            limit_mb: megabytes(max_bytes),
        })
    };

    let mut first = true;
    while let Some(field) = next_field(multipart, first).await.map_err(to_app_error)? {
        first = false;
        if field.name() == Some(field_name) {
            let (name, mime_type) = part_identity(&field);
            let data = field.bytes().await.map_err(to_app_error)?;
            return Ok(Some(build_upload(name, mime_type, data)));
        }
        field.bytes().await.map_err(to_app_error)?;
    }
    Ok(None)
}

/// Read every part named `field_name`, in order. Parts larger than
/// `max_file_bytes` are streamed through and reported as
/// [`ReceivedFile::Oversized`] instead of failing the request.
pub async fn read_file_fields(
    multipart: &mut Multipart,
    field_name: &str,
    max_file_bytes: usize,
    max_body_bytes: usize,
) -> AppResult<Vec<ReceivedFile>> {
    let to_app_error = |e: MultipartError| {
        multipart_error(e, AppError::UploadTooLarge {
            limit_mb: megabytes(max_body_bytes),
        })
    };

    let mut received = Vec::new();
    let mut first = true;
    while let Some(field) = next_field(multipart, first).await.map_err(to_app_error)? {
        first = false;
        if field.name() == Some(field_name) {
            received.push(read_limited(field, max_file_bytes).await.map_err(to_app_error)?);
        } else {
            field.bytes().await.map_err(to_app_error)?;
        }
    }
    Ok(received)
}

/// Reject uploads over the configured size.
pub fn ensure_within_limit(upload: &PdfUpload, max_bytes: usize) -> AppResult<()> {
    if upload.size > max_bytes {
        tracing::warn!(
            file_name = %upload.name,
            file_size = upload.size,
            max_size = max_bytes,
            "File size exceeds limit"
        );
        return Err(AppError::FileTooLarge {
            limit_mb: megabytes(max_bytes),
        });
    }
    Ok(())
}

/// Listing entry for an upload. Multipart parts carry no modification time,
/// so the receipt time stands in for it.
pub fn describe(upload: &PdfUpload) -> UploadedFile {
    UploadedFile {
        name: upload.name.clone(),
        size: upload.size,
        mime_type: upload.mime_type.clone().unwrap_or_default(),
        last_modified: Utc::now().timestamp_millis(),
    }
}

/// Next part of the form. A body that ends before the first part counts as
/// a form without parts.
async fn next_field<'a>(
    multipart: &'a mut Multipart,
    first: bool,
) -> Result<Option<Field<'a>>, MultipartError> {
    match multipart.next_field().await {
        Err(err) if first && err.body_text() == EMPTY_STREAM => {
            tracing::debug!("Multipart body contained no parts");
            Ok(None)
        }
        other => other,
    }
}

async fn read_limited(mut field: Field<'_>, max_bytes: usize) -> Result<ReceivedFile, MultipartError> {
    let (name, mime_type) = part_identity(&field);

    let mut buffer = BytesMut::new();
    let mut size = 0usize;
    while let Some(chunk) = field.chunk().await? {
        size += chunk.len();
        if size <= max_bytes {
            buffer.extend_from_slice(&chunk);
        } else {
            buffer = BytesMut::new();
        }
    }

    if size > max_bytes {
        return Ok(ReceivedFile::Oversized { name, size });
    }
    Ok(ReceivedFile::Accepted(build_upload(name, mime_type, buffer.freeze())))
}

fn part_identity(field: &Field<'_>) -> (String, Option<String>) {
    let name = field
        .file_name()
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME)
        .to_string();
    (name, field.content_type().map(|ct| ct.to_string()))
}

fn build_upload(name: String, mime_type: Option<String>, data: Bytes) -> PdfUpload {
    let mut upload = PdfUpload::new(name, data);
    if let Some(mime_type) = mime_type {
        upload = upload.with_mime_type(mime_type);
    }

    tracing::debug!(
        "Received file: {} ({} bytes, type: {:?})",
        upload.name,
        upload.size,
        upload.mime_type
    );
    upload
}

fn multipart_error(err: MultipartError, too_large: AppError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large
    } else {
        AppError::invalid_upload(err.body_text())
    }
}

fn megabytes(bytes: usize) -> usize {
    bytes / (1024 * 1024)
}
