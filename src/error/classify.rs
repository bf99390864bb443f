//! Maps raw library and upstream failures onto the fixed set of user-facing
//! error categories.

use super::AppError;
use crate::services::LlmError;

/// Classify a PDF extraction failure by the text of the underlying error.
pub fn classify_extraction_error(message: &str) -> AppError {
    let lower = message.to_lowercase();

    if lower.contains("password") || lower.contains("encrypt") {
        AppError::PasswordProtected
    } else if lower.contains("corrupt") || lower.contains("invalid") {
        AppError::CorruptedPdf
    } else if lower.contains("memory") {
        AppError::PdfTooComplex
    } else {
        AppError::ParseFailed {
            detail: message.to_string(),
        }
    }
}

/// Classify a language model failure. The HTTP status decides when one is
/// available, the message text otherwise.
pub fn classify_conversion_error(err: &LlmError) -> AppError {
    match err {
        LlmError::Api { status, .. } => match *status {
            401 | 403 => return AppError::InvalidApiKey,
            429 => return AppError::QuotaExceeded,
            408 | 504 => return AppError::ConversionTimeout,
            502 | 503 | 529 => return AppError::LlmUnavailable,
            _ => {}
        },
        LlmError::Transport { timeout: true, .. } => return AppError::ConversionTimeout,
        LlmError::Transport { connect: true, .. } => return AppError::LlmUnavailable,
        _ => {}
    }

    let message = err.to_string();
    let lower = message.to_lowercase();

    if lower.contains("api key") || lower.contains("api-key") || lower.contains("authentication") {
        AppError::InvalidApiKey
    } else if lower.contains("quota") || lower.contains("rate limit") || lower.contains("credit balance") {
        AppError::QuotaExceeded
    } else if lower.contains("timeout") || lower.contains("timed out") {
        AppError::ConversionTimeout
    } else if lower.contains("network") || lower.contains("connect") {
        AppError::LlmUnavailable
    } else {
        AppError::ConversionFailed { detail: message }
    }
}
