use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::Serialize;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// Content-type tag carried by every extracted payload, whatever the source format.
pub const PAYLOAD_MIME: &str = "text/plain";

/// The two résumé formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Maps a declared media type to a supported kind. Parameters such as
    /// `; charset=...` are ignored.
    pub fn from_mime(media_type: &str) -> Option<Self> {
        let essence = media_type.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case(PDF_MIME) {
            Some(DocumentKind::Pdf)
        } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }
}

/// A résumé file as received from the upload form. Dropped once extracted.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

/// Extracted résumé text, plus the base64 form sent to the model service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    pub text: String,
    pub mime_type: &'static str,
    pub data: String,
}

impl DocumentPayload {
    pub fn from_text(text: String) -> Self {
        let data = STANDARD.encode(text.as_bytes());
        Self {
            text,
            mime_type: PAYLOAD_MIME,
            data,
        }
    }
}
