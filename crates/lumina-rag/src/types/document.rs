//! Document and chunk types for the active session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for the currently indexed document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Document ID (new per upload)
    pub id: Uuid,
    /// Original filename
    pub filename: String,
    /// Page count, when the PDF library could determine it
    pub pages: Option<u32>,
    /// SHA-256 of the extracted text
    pub content_hash: String,
    /// Whitespace-token count of the extracted text
    pub word_count: usize,
    /// Number of chunks produced
    pub chunk_count: u32,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentInfo {
    /// Create metadata for a freshly extracted document
    pub fn new(
        filename: String,
        pages: Option<u32>,
        content_hash: String,
        word_count: usize,
        chunk_count: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            pages,
            content_hash,
            word_count,
            chunk_count,
            uploaded_at: Utc::now(),
        }
    }
}

/// A contiguous window of document words
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Ordinal within the document (0-based, matches the index ordinal)
    pub index: u32,
    /// Offset of the first word of this chunk in the document word list
    pub word_offset: usize,
    /// Chunk text (words joined by single spaces)
    pub content: String,
}

impl Chunk {
    pub fn new(index: u32, word_offset: usize, content: String) -> Self {
        Self {
            index,
            word_offset,
            content,
        }
    }
}
