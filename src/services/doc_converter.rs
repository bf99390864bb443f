use std::sync::Arc;

use chrono::{SecondsFormat, Utc};

use crate::error::{classify_conversion_error, AppResult};
use crate::models::{DocContent, DocMetadata, PdfUpload};
use crate::services::{CompletionClient, PdfProcessor};

const CONVERSION_PROMPT: &str = "Please convert the following PDF content into a well-formatted DOC (Word document) structure.

Requirements:
1. Maintain the original document structure and formatting
2. Preserve headings, subheadings, and hierarchy
3. Keep paragraphs and line breaks intact
4. Maintain any lists, tables, or special formatting
5. Ensure proper document flow and readability
6. Add appropriate spacing and formatting for a Word document

PDF Content:
{pdf_text}

Please provide the converted content in a format that can be directly used in a Word document. Include proper formatting markers where needed.";

pub fn conversion_prompt(pdf_text: &str) -> String {
    CONVERSION_PROMPT.replace("{pdf_text}", pdf_text)
}

/// Extracts a PDF's text and asks the language model to restructure it as a
/// Word document.
pub struct DocConverter {
    processor: PdfProcessor,
    client: Arc<dyn CompletionClient>,
}

impl DocConverter {
    pub fn new(processor: PdfProcessor, client: Arc<dyn CompletionClient>) -> Self {
        Self { processor, client }
    }

    pub async fn convert(&self, file: &PdfUpload) -> AppResult<DocContent> {
        let extraction = self.processor.extract_full(file).await?;

        tracing::info!(
            file_name = %file.name,
            pages = extraction.pages,
            text_length = extraction.text.len(),
            "Requesting document conversion"
        );

        let prompt = conversion_prompt(&extraction.text);
        let content = self.client.complete(&prompt).await.map_err(|e| {
            tracing::warn!(file_name = %file.name, error = %e, "Language model call failed");
            classify_conversion_error(&e)
        })?;

        Ok(DocContent {
            title: extraction.info.title,
            content,
            metadata: DocMetadata {
                original_pages: extraction.pages,
                converted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                original_file: file.name.clone(),
            },
        })
    }
}
