use std::time::Instant;
use bytes::Bytes;
use lopdf::Document;

use crate::error::{classify_extraction_error, AppError, AppResult};
use crate::models::{DocumentInfo, PdfUpload};
use crate::services::pdf_metadata::InfoFields;

/// Appended to preview text that was cut at the configured length.
pub const TRUNCATION_MARKER: &str = "\n\n... [Content truncated for preview]";

// Readers tolerate leading junk before the header within the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

#[derive(Debug, Clone)]
pub struct PdfProcessor {
    max_text_length: usize,
}

#[derive(Debug)]
pub struct ExtractionResult {
    pub text: String,
    pub pages: usize,
    pub info: DocumentInfo,
    pub truncated: bool,
    pub processing_time_ms: u64,
}

struct RawDocument {
    text: String,
    pages: usize,
    info: DocumentInfo,
}

impl PdfProcessor {
    pub fn new(max_text_length: usize) -> Self {
        Self { max_text_length }
    }

    /// Extract normalized text cut to the preview length, plus page count and
    /// metadata.
    pub async fn extract_preview(&self, file: &PdfUpload) -> AppResult<ExtractionResult> {
        let start = Instant::now();
        let raw = self.extract(file).await?;

        let normalized = normalize_whitespace(&raw.text);
        let (text, truncated) = truncate_preview(normalized, self.max_text_length);

        Ok(ExtractionResult {
            text,
            pages: raw.pages,
            info: raw.info,
            truncated,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Extract the whole normalized text without the preview cut.
    pub async fn extract_full(&self, file: &PdfUpload) -> AppResult<ExtractionResult> {
        let start = Instant::now();
        let raw = self.extract(file).await?;

        Ok(ExtractionResult {
            text: normalize_whitespace(&raw.text),
            pages: raw.pages,
            info: raw.info,
            truncated: false,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn extract(&self, file: &PdfUpload) -> AppResult<RawDocument> {
        tracing::info!(
            "Starting PDF text extraction for file: {} ({} bytes)",
            file.name,
            file.size
        );

        if !file.is_pdf() {
            return Err(AppError::NotPdf);
        }

        let content = file.content.clone();
        let fallback_title = file.stem().to_string();

        // pdf-extract is CPU bound and may panic on malformed input; the
        // blocking pool contains both.
        let raw = tokio::task::spawn_blocking(move || extract_blocking(content, &fallback_title))
            .await??;

        tracing::debug!(
            "PDF text extraction successful, {} characters across {} pages",
            raw.text.chars().count(),
            raw.pages
        );
        Ok(raw)
    }
}

fn extract_blocking(content: Bytes, fallback_title: &str) -> AppResult<RawDocument> {
    if !has_pdf_header(&content) {
        tracing::warn!("Upload has no %PDF- header");
        return Err(AppError::CorruptedPdf);
    }

    let mut document = Document::load_mem(&content).map_err(|e| {
        tracing::warn!("PDF structure could not be loaded: {}", e);
        classify_extraction_error(&e.to_string())
    })?;

    // Strings stay encrypted after loading. Documents that only carry an
    // owner password open with the empty user password.
    if document.is_encrypted() {
        document.decrypt("").map_err(|e| {
            tracing::warn!("Encrypted PDF could not be opened: {}", e);
            classify_extraction_error(&e.to_string())
        })?;
    }

    let pages = document.get_pages().len();
    let info = InfoFields::read(&document).into_document_info(fallback_title);
    drop(document);

    let text = pdf_extract::extract_text_from_mem(&content).map_err(|e| {
        tracing::warn!("PDF text extraction failed: {}", e);
        classify_extraction_error(&e.to_string())
    })?;

    Ok(RawDocument { text, pages, info })
}

fn has_pdf_header(content: &[u8]) -> bool {
    let window = &content[..content.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

/// Collapse every run of whitespace (including page breaks) into one space
/// and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to `max_chars` characters and append [`TRUNCATION_MARKER`].
/// Text at or under the limit is returned untouched.
pub fn truncate_preview(text: String, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut preview = String::with_capacity(cut + TRUNCATION_MARKER.len());
            preview.push_str(&text[..cut]);
            preview.push_str(TRUNCATION_MARKER);
            (preview, true)
        }
        None => (text, false),
    }
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new(10_000)
    }
}
