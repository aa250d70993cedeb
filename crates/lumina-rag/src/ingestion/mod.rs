//! PDF ingestion: text extraction and word-window chunking

mod chunker;
mod parser;

pub use chunker::WordChunker;
pub use parser::{ExtractedDocument, PdfExtractor};
