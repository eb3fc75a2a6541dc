//! # pharmalens-pdf: PDF Text Extraction
//!
//! Pulls the raw text out of a PDF, page by page, for the scanner. No
//! layout reconstruction is attempted: text-draw operations are concatenated
//! in document order, with a blank line between pages. Whatever comes out is
//! fed to the summarization pipeline as-is.

use pdf::file::FileOptions;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PdfExtractError {
    #[error("Failed to parse PDF content: {0}")]
    Parse(String),
}

/// Extracts text from all pages of a PDF.
pub fn extract_text(pdf_data: &[u8]) -> Result<String, PdfExtractError> {
    let file = FileOptions::cached()
        .load(pdf_data)
        .map_err(|e| PdfExtractError::Parse(e.to_string()))?;
    let resolver = file.resolver();
    let mut full_text = String::new();

    for page_num in 0..file.num_pages() {
        let page = file
            .get_page(page_num)
            .map_err(|e| PdfExtractError::Parse(e.to_string()))?;
        if let Some(content) = &page.contents {
            let operations = content
                .operations(&resolver)
                .map_err(|e| PdfExtractError::Parse(e.to_string()))?;
            for op in operations.iter() {
                if let pdf::content::Op::TextDraw { text } = op {
                    full_text.push_str(&text.to_string_lossy());
                }
            }
        }
        if page_num + 1 < file.num_pages() {
            full_text.push_str("\n\n");
        }
    }

    debug!(
        pages = file.num_pages(),
        chars = full_text.chars().count(),
        "extracted PDF text"
    );
    Ok(full_text)
}
