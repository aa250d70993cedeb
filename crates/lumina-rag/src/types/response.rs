//! Response types for the HTTP API

use serde::{Deserialize, Serialize};

/// Response from POST /upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Always "ok" on success
    pub status: String,
    /// Number of chunks created and indexed
    pub chunk_count: usize,
    /// Original filename
    pub filename: String,
    /// Page count, when known
    pub pages: Option<u32>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Response from POST /ask
///
/// `answer` is the natural-language reply to render; `structured` is the JSON
/// summary object when the model supplied one; `sources` are short "Source N"
/// snippets; `raw` is the unmodified model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Natural-language answer
    pub answer: String,
    /// Parsed JSON summary from the model, if present
    pub structured: Option<serde_json::Value>,
    /// Source snippets (each at most 120 characters)
    pub sources: Vec<String>,
    /// Raw model output
    pub raw: String,
}

/// Response from GET /greet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetResponse {
    pub greeting: String,
}

/// Preview of a single chunk for GET /debug/chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkPreview {
    /// Chunk ordinal
    pub index: u32,
    /// Leading content (truncated to 300 characters)
    pub content: String,
    /// Full chunk length in characters
    pub length: usize,
}

/// Response from GET /debug/chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugChunksResponse {
    /// Total chunks in the session
    pub total_chunks: usize,
    /// Previews of the first few chunks
    pub chunks_preview: Vec<ChunkPreview>,
}

/// Response from GET /debug/model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCheckResponse {
    /// Generation model name
    pub model: String,
    /// Prompt that was sent
    pub prompt: String,
    /// Model reply, if any
    pub response: Option<String>,
    /// Whether the model produced a non-empty reply
    pub working: bool,
}
