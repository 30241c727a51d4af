//! Text extraction for uploaded documents

use shared::MSG_DOCUMENT_EMPTY;

use crate::error::{AppError, AppResult};

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_TEXT: &str = "text/plain";

const PDF_MAGIC: &[u8] = b"%PDF";

/// Upload formats the explanation flow accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Pick the format from the declared content type, falling back to the PDF magic bytes
    pub fn detect(content_type: Option<&str>, bytes: &[u8]) -> Option<Self> {
        let essence = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());

        match essence.as_deref() {
            Some(MIME_PDF) => Some(DocumentKind::Pdf),
            Some(MIME_TEXT) => Some(DocumentKind::PlainText),
            _ if bytes.starts_with(PDF_MAGIC) => Some(DocumentKind::Pdf),
            _ => None,
        }
    }
}

/// Extract plain text from an uploaded document
///
/// PDF parsing runs on the blocking pool. Unreadable or blank documents are
/// client errors.
pub async fn extract_document_text(bytes: Vec<u8>, content_type: Option<&str>) -> AppResult<String> {
    let kind = DocumentKind::detect(content_type, &bytes).ok_or_else(|| {
        AppError::validation(format!(
            "Unsupported document type: {}",
            content_type.unwrap_or("unknown")
        ))
    })?;

    let text = match kind {
        DocumentKind::PlainText => String::from_utf8(bytes)
            .map_err(|_| AppError::validation("Document is not valid UTF-8 text."))?,
        DocumentKind::Pdf => {
            let parsed = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "PDF extraction aborted");
                    AppError::validation(MSG_DOCUMENT_EMPTY)
                })?;

            parsed.map_err(|e| {
                tracing::warn!(error = %e, "PDF extraction failed");
                AppError::validation(MSG_DOCUMENT_EMPTY)
            })?
        }
    };

    if text.trim().is_empty() {
        return Err(AppError::validation(MSG_DOCUMENT_EMPTY));
    }

    tracing::debug!(kind = ?kind, chars = text.len(), "Document text extracted");
    Ok(text)
}
