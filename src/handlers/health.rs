use axum::response::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::debug;

use crate::models::HealthResponse;

/// Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    debug!("Health check requested");

    Json(HealthResponse {
        status: "OK".to_string(),
        message: "PDF parsing service is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Describes the API surface.
pub async fn api_index_handler() -> Json<Value> {
    Json(json!({
        "message": "PDF Parsing Backend API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/upload": "List the PDF files in a multi-file upload",
            "POST /api/parse-pdf": "Parse PDF file and extract content",
            "POST /api/convert-pdf-to-doc": "Convert PDF content to a Word document structure",
            "GET /health": "Health check endpoint"
        }
    }))
}
