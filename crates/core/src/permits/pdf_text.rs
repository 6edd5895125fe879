use lopdf::Document;

use crate::errors::{Error, Result};

/// Extracts the text of every page of a PDF, in page order.
pub fn pdf_to_text(bytes: &[u8]) -> Result<String> {
    let document = Document::load_mem(bytes)
        .map_err(|e| Error::Document(format!("Unreadable PDF: {}", e)))?;
    let pages: Vec<u32> = document.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Err(Error::Document("PDF has no pages".to_string()));
    }
    document
        .extract_text(&pages)
        .map_err(|e| Error::Document(format!("Failed to extract PDF text: {}", e)))
}
