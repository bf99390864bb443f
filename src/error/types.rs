use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No file provided")]
    MissingFile,

    #[error("No files provided")]
    MissingFiles,

    #[error("No valid PDF files found")]
    NoValidPdf,

    #[error("File must be a PDF")]
    NotPdf,

    #[error("File exceeds maximum size of {limit_mb}MB")]
    FileTooLarge { limit_mb: usize },

    #[error("Upload exceeds maximum total size of {limit_mb}MB")]
    UploadTooLarge { limit_mb: usize },

    #[error("Invalid upload: {message}")]
    InvalidUpload { message: String },

    #[error("PDF is password-protected and cannot be parsed")]
    PasswordProtected,

    #[error("PDF file appears to be corrupted or invalid")]
    CorruptedPdf,

    #[error("PDF file is too large to process")]
    PdfTooComplex,

    #[error("Failed to parse PDF")]
    ParseFailed { detail: String },

    #[error("Claude API key not configured")]
    ApiKeyNotConfigured,

    #[error("Claude API key is invalid or missing")]
    InvalidApiKey,

    #[error("API quota exceeded")]
    QuotaExceeded,

    #[error("Conversion timed out")]
    ConversionTimeout,

    #[error("Language model service is not available")]
    LlmUnavailable,

    #[error("Failed to convert PDF to DOC")]
    ConversionFailed { detail: String },

    #[error("Internal server error")]
    Internal { message: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingFile => "MISSING_FILE",
            AppError::MissingFiles => "MISSING_FILES",
            AppError::NoValidPdf => "NO_VALID_PDF",
            AppError::NotPdf => "NOT_PDF",
            AppError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AppError::UploadTooLarge { .. } => "UPLOAD_TOO_LARGE",
            AppError::InvalidUpload { .. } => "INVALID_UPLOAD",
            AppError::PasswordProtected => "PASSWORD_PROTECTED",
            AppError::CorruptedPdf => "CORRUPTED_PDF",
            AppError::PdfTooComplex => "PDF_TOO_COMPLEX",
            AppError::ParseFailed { .. } => "PARSE_FAILED",
            AppError::ApiKeyNotConfigured => "API_KEY_NOT_CONFIGURED",
            AppError::InvalidApiKey => "INVALID_API_KEY",
            AppError::QuotaExceeded => "QUOTA_EXCEEDED",
            AppError::ConversionTimeout => "CONVERSION_TIMEOUT",
            AppError::LlmUnavailable => "LLM_UNAVAILABLE",
            AppError::ConversionFailed { .. } => "CONVERSION_FAILED",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFile
            | AppError::MissingFiles
            | AppError::NoValidPdf
            | AppError::NotPdf
            | AppError::InvalidUpload { .. } => StatusCode::BAD_REQUEST,
            AppError::FileTooLarge { .. } | AppError::UploadTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::PasswordProtected
            | AppError::CorruptedPdf
            | AppError::PdfTooComplex
            | AppError::ParseFailed { .. }
            | AppError::ApiKeyNotConfigured
            | AppError::InvalidApiKey
            | AppError::QuotaExceeded
            | AppError::ConversionTimeout
            | AppError::LlmUnavailable
            | AppError::ConversionFailed { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Underlying cause for variants whose user-facing message hides it.
    fn detail(&self) -> Option<&str> {
        match self {
            AppError::InvalidUpload { message } | AppError::Internal { message } => Some(message),
            AppError::ParseFailed { detail } | AppError::ConversionFailed { detail } => Some(detail),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        // Emitted inside the request span, which carries the request id.
        if status.is_server_error() {
            tracing::error!(
                error_code = error_code,
                status_code = %status,
                error_message = %message,
                detail = self.detail().unwrap_or(""),
                "API error occurred"
            );
        } else {
            tracing::warn!(
                error_code = error_code,
                status_code = %status,
                error_message = %message,
                "Request rejected"
            );
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            AppError::ParseFailed {
                detail: "extraction library panicked".to_string(),
            }
        } else {
            AppError::Internal {
                message: format!("Extraction task failed: {}", err),
            }
        }
    }
}

impl AppError {
    pub fn invalid_upload(message: impl Into<String>) -> Self {
        AppError::InvalidUpload {
            message: message.into(),
        }
    }
}
