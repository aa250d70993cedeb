//! Fixed-size sliding-window chunking over whitespace-tokenized words

use crate::types::Chunk;

/// Splits document text into overlapping windows of words
pub struct WordChunker {
    /// Words per chunk
    chunk_size: usize,
    /// Words shared between consecutive chunks
    overlap: usize,
}

impl WordChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
        }
    }

    /// Window advance per chunk. Falls back to a full window when the overlap
    /// is not smaller than the chunk size, so the walk always terminates.
    fn step(&self) -> usize {
        if self.chunk_size > self.overlap {
            self.chunk_size - self.overlap
        } else {
            self.chunk_size
        }
    }

    /// Chunk text into overlapping word windows
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let step = self.step();
        let mut chunks = Vec::new();
        let mut offset = 0usize;

        while offset < words.len() {
            let end = (offset + self.chunk_size).min(words.len());
            let content = words[offset..end].join(" ");
            if !content.is_empty() {
                chunks.push(Chunk::new(chunks.len() as u32, offset, content));
            }
            offset += step;
        }

        chunks
    }
}
