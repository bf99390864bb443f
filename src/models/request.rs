use bytes::Bytes;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A single file part read from a multipart form, held in memory for the
/// duration of one request.
#[derive(Debug, Clone)]
pub struct PdfUpload {
    pub name: String,
    pub size: usize,
    pub content: Bytes,
    pub mime_type: Option<String>,
}

impl PdfUpload {
    pub fn new(name: String, content: Bytes) -> Self {
        let size = content.len();
        Self {
            name,
            size,
            content,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: String) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    /// True when the declared content type is `application/pdf`. Parameters
    /// and letter case are ignored; an undeclared type is not a PDF.
    pub fn is_pdf(&self) -> bool {
        self.mime_type
            .as_deref()
            .map(is_pdf_mime)
            .unwrap_or(false)
    }

    /// File name with a trailing `.pdf` extension removed.
    pub fn stem(&self) -> &str {
        let name = self.name.as_str();
        let split = name.len().checked_sub(4).filter(|&i| name.is_char_boundary(i));
        match split {
            Some(i) if name[i..].eq_ignore_ascii_case(".pdf") => &name[..i],
            _ => name,
        }
    }
}

pub fn is_pdf_mime(mime: &str) -> bool {
    mime.split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MIME_TYPE))
        .unwrap_or(false)
}
