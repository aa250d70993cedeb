//! PDF text extraction with a watchdog timeout and a lopdf fallback

use sha2::{Digest, Sha256};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

/// How long to wait for pdf-extract before falling back. Some PDFs with
/// unusual embedded fonts make the extractor crawl.
const EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Extracted document text with metadata
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Normalized text content
    pub text: String,
    /// Page count, when the PDF structure could be read
    pub pages: Option<u32>,
    /// SHA-256 hex digest of the normalized text
    pub content_hash: String,
}

/// PDF text extractor
pub struct PdfExtractor;

impl PdfExtractor {
    /// Extract and normalize text from PDF bytes
    pub fn extract(data: &[u8]) -> Result<ExtractedDocument> {
        let raw = Self::extract_with_timeout(data)?;
        let text = normalize_text(&raw);

        if text.trim().is_empty() {
            return Err(Error::EmptyDocument);
        }

        let pages = match lopdf::Document::load_mem(data) {
            Ok(doc) => Some(doc.get_pages().len() as u32),
            Err(e) => {
                tracing::debug!("could not read PDF page tree: {}", e);
                None
            }
        };

        Ok(ExtractedDocument {
            content_hash: hash_content(&text),
            text,
            pages,
        })
    }

    /// Run pdf-extract in a watchdog thread so a pathological file cannot
    /// hang the upload handler indefinitely.
    fn extract_with_timeout(data: &[u8]) -> Result<String> {
        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&data_vec);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(EXTRACT_TIMEOUT) {
            Ok(Ok(text)) => {
                let _ = handle.join();
                Ok(text)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                tracing::warn!("pdf-extract failed: {}, trying lopdf fallback", e);
                Self::extract_fallback(data)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // The worker thread may still be running; it will be dropped
                // with the channel when it eventually finishes.
                tracing::error!(
                    "PDF extraction timed out after {}s, trying lopdf fallback",
                    EXTRACT_TIMEOUT.as_secs()
                );
                Self::extract_fallback(data)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread crashed, trying lopdf fallback");
                Self::extract_fallback(data)
            }
        }
    }

    /// Fallback extraction using lopdf's page-level text extraction
    fn extract_fallback(data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::Pdf(format!("failed to load PDF: {}", e)))?;

        let mut all_text = String::new();
        for (page_num, _) in doc.get_pages() {
            match doc.extract_text(&[page_num]) {
                Ok(text) if !text.trim().is_empty() => {
                    all_text.push_str(&text);
                    all_text.push('\n');
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("could not extract text from page {}: {}", page_num, e);
                }
            }
        }

        if all_text.trim().is_empty() {
            return Err(Error::Pdf(
                "PDF appears to be image-based or has no extractable text".to_string(),
            ));
        }

        Ok(all_text)
    }
}

/// Strip null characters, trim each line, and drop empty lines
fn normalize_text(text: &str) -> String {
    text.replace('\0', "")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// SHA-256 hex digest used as the document fingerprint
fn hash_content(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
