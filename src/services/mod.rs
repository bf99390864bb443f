pub mod doc_converter;
pub mod llm_client;
pub mod pdf_metadata;
pub mod pdf_processor;

pub use doc_converter::DocConverter;
pub use llm_client::{AnthropicClient, CompletionClient, LlmError};
pub use pdf_processor::{ExtractionResult, PdfProcessor, TRUNCATION_MARKER};
