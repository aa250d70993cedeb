//! Application state for the chat server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::index::{top_chunks, FlatIpIndex, RetrievedChunk};
use crate::providers::{EmbeddingProvider, LlmProvider, OllamaProvider};
use crate::types::response::ChunkPreview;
use crate::types::{Chunk, DocumentInfo};

/// Everything derived from one uploaded PDF. A new upload replaces the whole
/// session, the typed stand-in for the original service's process globals.
pub struct DocumentSession {
    /// Document metadata
    pub document: DocumentInfo,
    /// Chunks in ordinal order (lockstep with the index)
    pub chunks: Vec<Chunk>,
    /// Flat inner-product index over the chunk embeddings
    pub index: FlatIpIndex,
}

impl DocumentSession {
    /// Retrieve the `k` chunks most similar to the query embedding
    pub fn retrieve(&self, query_embedding: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        top_chunks(&self.index, &self.chunks, query_embedding, k)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Embedding provider
    embedding_provider: Arc<dyn EmbeddingProvider>,
    /// LLM provider
    llm_provider: Arc<dyn LlmProvider>,
    /// Active document session; `None` until the first upload
    session: RwLock<Option<DocumentSession>>,
}

impl AppState {
    /// Create new application state with Ollama providers
    pub fn new(config: RagConfig) -> Self {
        let (embedder, llm) = OllamaProvider::new(&config.llm).split();
        tracing::info!(
            "providers initialized (embeddings: {}, generation: {})",
            config.llm.embed_model,
            config.llm.generate_model
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                embedding_provider: Arc::new(embedder),
                llm_provider: Arc::new(llm),
                session: RwLock::new(None),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get embedding provider
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedding_provider
    }

    /// Get LLM provider
    pub fn llm_provider(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm_provider
    }

    /// Whether a document has been uploaded
    pub fn has_document(&self) -> bool {
        self.inner.session.read().is_some()
    }

    /// Replace the active session with a freshly indexed document
    pub fn replace_session(&self, session: DocumentSession) {
        let mut guard = self.inner.session.write();
        if let Some(old) = guard.as_ref() {
            tracing::info!(
                "replacing session for '{}' ({} chunks)",
                old.document.filename,
                old.chunks.len()
            );
        }
        *guard = Some(session);
    }

    /// Metadata for the active document
    pub fn document_info(&self) -> Option<DocumentInfo> {
        self.inner.session.read().as_ref().map(|s| s.document.clone())
    }

    /// Retrieve top-k chunks for a query embedding from the active session
    pub fn retrieve(&self, query_embedding: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        let guard = self.inner.session.read();
        let session = guard.as_ref().ok_or(Error::NoDocument)?;
        session.retrieve(query_embedding, k)
    }

    /// Total chunk count plus previews of the first `n` chunks
    pub fn chunk_previews(&self, n: usize) -> Result<(usize, Vec<ChunkPreview>)> {
        let guard = self.inner.session.read();
        let session = guard.as_ref().ok_or(Error::NoDocument)?;

        let previews = session
            .chunks
            .iter()
            .take(n)
            .map(|chunk| ChunkPreview {
                index: chunk.index,
                content: crate::generation::truncate_chars(&chunk.content, 300),
                length: chunk.content.chars().count(),
            })
            .collect();

        Ok((session.chunks.len(), previews))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn test_session() -> DocumentSession {
        let mut index = FlatIpIndex::new();
        let mut chunks = Vec::new();
        for (i, v) in [[1.0f32, 0.0], [0.0, 1.0], [0.6, 0.8]].iter().enumerate() {
            index.insert(v).expect("insert");
            chunks.push(Chunk::new(i as u32, i * 400, format!("content of chunk {i}")));
        }
        DocumentSession {
            document: DocumentInfo {
                id: Uuid::new_v4(),
                filename: "paper.pdf".to_string(),
                pages: Some(3),
                content_hash: "abc".to_string(),
                word_count: 1200,
                chunk_count: 3,
                uploaded_at: Utc::now(),
            },
            chunks,
            index,
        }
    }

    #[test]
    fn session_retrieve_maps_ordinals_to_chunks() {
        let session = test_session();
        let retrieved = session.retrieve(&[0.0, 1.0], 2).expect("retrieve");
        assert_eq!(retrieved.len(), 2);
        assert_eq!(retrieved[0].content, "content of chunk 1");
        assert_eq!(retrieved[1].content, "content of chunk 2");
    }

    #[test]
    fn upload_replaces_prior_session() {
        let state = AppState::new(RagConfig::default());
        assert!(!state.has_document());
        assert!(matches!(state.retrieve(&[1.0, 0.0], 3), Err(Error::NoDocument)));

        state.replace_session(test_session());
        assert!(state.has_document());
        assert_eq!(state.document_info().expect("info").filename, "paper.pdf");

        let mut replacement = test_session();
        replacement.document.filename = "other.pdf".to_string();
        state.replace_session(replacement);
        assert_eq!(state.document_info().expect("info").filename, "other.pdf");
    }

    #[test]
    fn chunk_previews_clip_content() {
        let state = AppState::new(RagConfig::default());
        let mut session = test_session();
        session.chunks[0].content = "x".repeat(500);
        state.replace_session(session);

        let (total, previews) = state.chunk_previews(2).expect("previews");
        assert_eq!(total, 3);
        assert_eq!(previews.len(), 2);
        assert_eq!(previews[0].content.chars().count(), 300);
        assert_eq!(previews[0].length, 500);
    }
}
