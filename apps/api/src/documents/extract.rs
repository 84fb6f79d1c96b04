use docx_rs::{DocumentChild, InsertChild, ParagraphChild, Run, RunChild};
use thiserror::Error;

use crate::models::document::{DocumentKind, DocumentPayload, UploadedDocument};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type '{0}': upload a PDF or Word (.docx) resume")]
    UnsupportedMediaType(String),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Could not read Word document: {0}")]
    Docx(String),

    #[error("No extractable text found in document")]
    Empty,

    #[error("Extraction aborted: {0}")]
    Aborted(String),
}

/// Validates the declared media type and extracts the document's text.
///
/// Blocking; callers on the async runtime should run it via `spawn_blocking`.
pub fn extract_document(document: &UploadedDocument) -> Result<DocumentPayload, ExtractError> {
    let kind = DocumentKind::from_mime(&document.media_type)
        .ok_or_else(|| ExtractError::UnsupportedMediaType(document.media_type.clone()))?;

    let text = extract_text(kind, &document.bytes)?;
    if text.trim().is_empty() {
        return Err(ExtractError::Empty);
    }

    Ok(DocumentPayload::from_text(text))
}

pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Pdf => extract_pdf_text(bytes),
        DocumentKind::Docx => extract_docx_text(bytes),
    }
}

/// All pages in page order. Pages without a text layer add nothing.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Paragraph texts in document order, one per line.
fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(&p.children)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    push_paragraph_children(&mut text, children);
    text
}

/// Walks runs, tracked insertions and hyperlinks. Deleted text is skipped.
fn push_paragraph_children(text: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(text, run),
            ParagraphChild::Insert(insert) => {
                for insert_child in &insert.children {
                    if let InsertChild::Run(run) = insert_child {
                        push_run(text, run);
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(text, &link.children),
            _ => {}
        }
    }
}

fn push_run(text: &mut String, run: &Run) {
    for run_child in &run.children {
        match run_child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}
