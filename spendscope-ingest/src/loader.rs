//! Document loader: PDF bytes to page-level text.
//!
//! The bytes are only borrowed for the call; nothing is written to disk.

use lopdf::Document;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::layout;
use crate::types::{PageText, StatementDocument};

/// Load a statement PDF from memory.
///
/// Fails with [`IngestError::UnreadableDocument`] when the bytes are not a
/// PDF, the PDF is encrypted, or no page carries a text layer (scans).
pub fn load_pdf(bytes: &[u8]) -> Result<StatementDocument> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| IngestError::UnreadableDocument(format!("not a valid PDF ({e})")))?;

    if doc.is_encrypted() {
        return Err(IngestError::UnreadableDocument(
            "the PDF is password protected".to_string(),
        ));
    }

    let mut pages = Vec::new();
    for (number, page_id) in doc.get_pages() {
        let text = match layout::page_text(&doc, page_id) {
            Ok(text) => text,
            Err(e) => {
                warn!(page = number, error = %e, "layout extraction failed; falling back to plain text");
                // A single broken page should not sink the whole statement.
                doc.extract_text(&[number]).unwrap_or_else(|e| {
                    warn!(page = number, error = %e, "page text extraction failed; treating page as empty");
                    String::new()
                })
            }
        };
        debug!(page = number, chars = text.len(), "extracted page text");
        pages.push(PageText {
            number: number as usize,
            text,
        });
    }

    let document = StatementDocument { pages };
    if !document.has_text() {
        return Err(IngestError::UnreadableDocument(
            "no extractable text layer (scanned image without OCR?)".to_string(),
        ));
    }

    info!(pages = document.page_count(), "loaded statement PDF");
    Ok(document)
}

/// Read a PDF from disk and load it.
pub fn load_pdf_path(path: impl AsRef<Path>) -> Result<StatementDocument> {
    let bytes = std::fs::read(path.as_ref())?;
    load_pdf(&bytes)
}
