//! Text extraction: turn uploaded PDF bytes into one concatenated text blob.
//!
//! ## Why spawn_blocking?
//!
//! `lopdf` parses the whole document synchronously and text decoding is
//! CPU-bound. `tokio::task::spawn_blocking` moves the work onto the blocking
//! thread pool so the async worker threads never stall on a large document.
//!
//! ## Page order and failure granularity
//!
//! Pages are processed strictly in ascending order 1..N — no reordering, no
//! skipping. A single unreadable page fails the whole extraction: partial
//! text would silently change which questions the service generates, which
//! is worse than an explicit error the user can act on.

use crate::error::Pdf2QaError;
use crate::pipeline::input::UploadedFile;
use async_trait::async_trait;
use lopdf::Document;
use tracing::debug;

/// Capability seam over the PDF text-extraction library.
///
/// The controller only ever talks to this trait, so tests drive the state
/// machine with scripted extractors and no real PDF parsing.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the document's text: per-page fragments joined by single
    /// spaces, with a trailing space after each page.
    async fn extract(&self, file: UploadedFile) -> Result<String, Pdf2QaError>;
}

/// Default extractor backed by `lopdf`.
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LopdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for LopdfExtractor {
    async fn extract(&self, file: UploadedFile) -> Result<String, Pdf2QaError> {
        tokio::task::spawn_blocking(move || extract_blocking(&file.bytes))
            .await
            .map_err(|e| Pdf2QaError::Extraction {
                detail: format!("extraction task panicked: {e}"),
            })?
    }
}

/// Blocking implementation of the extraction.
fn extract_blocking(bytes: &[u8]) -> Result<String, Pdf2QaError> {
    let document = Document::load_mem(bytes).map_err(|e| Pdf2QaError::Extraction {
        detail: format!("failed to parse PDF: {e}"),
    })?;

    // BTreeMap keys iterate in ascending page-number order.
    let pages = document.get_pages();
    debug!("extracting text from {} pages", pages.len());

    let mut text = String::new();
    for (&page_num, _) in &pages {
        let page_text =
            document
                .extract_text(&[page_num])
                .map_err(|e| Pdf2QaError::Extraction {
                    detail: format!("page {page_num}: {e}"),
                })?;
        let fragments: Vec<&str> = page_text.split_whitespace().collect();
        text.push_str(&fragments.join(" "));
        text.push(' ');
    }

    Ok(text)
}
