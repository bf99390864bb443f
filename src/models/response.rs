use serde::{Deserialize, Serialize};

/// Body of a successful `POST /api/parse-pdf`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParseResponse {
    pub success: bool,
    pub text: String,
    pub pages: usize,
    pub info: DocumentInfo,
}

/// Document metadata with every field resolved to a display value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: String,
    pub mod_date: String,
    pub keywords: String,
    pub language: String,
}

/// One entry of the `POST /api/upload` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    pub size: usize,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Milliseconds since the Unix epoch.
    pub last_modified: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<UploadedFile>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub success: bool,
    pub doc_content: DocContent,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocContent {
    pub title: String,
    pub content: String,
    pub metadata: DocMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocMetadata {
    pub original_pages: usize,
    pub converted_at: String,
    pub original_file: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

impl ParseResponse {
    pub fn new(text: String, pages: usize, info: DocumentInfo) -> Self {
        Self {
            success: true,
            text,
            pages,
            info,
        }
    }
}

impl UploadResponse {
    pub fn new(files: Vec<UploadedFile>) -> Self {
        Self {
            message: "Files uploaded successfully".to_string(),
            count: files.len(),
            files,
        }
    }
}

impl ConvertResponse {
    pub fn new(doc_content: DocContent) -> Self {
        Self {
            success: true,
            doc_content,
            message: "PDF successfully converted to DOC format".to_string(),
        }
    }
}
