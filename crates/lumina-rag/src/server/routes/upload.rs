//! PDF upload endpoint: extract, chunk, embed, index

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::index::FlatIpIndex;
use crate::ingestion::{PdfExtractor, WordChunker};
use crate::server::state::{AppState, DocumentSession};
use crate::types::response::UploadResponse;
use crate::types::DocumentInfo;

/// POST /upload - ingest a PDF, replacing any prior session
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();

    // Find the "pdf" field
    let mut payload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Multipart(e.to_string()))?
    {
        if field.name() == Some("pdf") {
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "document.pdf".to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| Error::Multipart(e.to_string()))?;
            payload = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, data) = payload.ok_or(Error::MissingFile)?;
    tracing::info!("processing upload '{}' ({} bytes)", filename, data.len());

    // PDF extraction is CPU-bound sync work
    let extracted = tokio::task::spawn_blocking(move || PdfExtractor::extract(&data))
        .await
        .map_err(|e| Error::Internal(format!("extraction task failed: {}", e)))??;

    let word_count = extracted.text.split_whitespace().count();

    let chunking = &state.config().chunking;
    let chunker = WordChunker::new(chunking.chunk_size, chunking.overlap);
    let chunks = chunker.chunk(&extracted.text);
    if chunks.is_empty() {
        return Err(Error::EmptyDocument);
    }

    tracing::info!(
        "extracted {} words into {} chunks from '{}'",
        word_count,
        chunks.len(),
        filename
    );
    for chunk in chunks.iter().take(3) {
        tracing::debug!(
            "chunk {}: {:?}...",
            chunk.index,
            crate::generation::truncate_chars(&chunk.content, 200)
        );
    }

    // Embed every chunk and build the session index
    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = state.embedding_provider().embed_batch(&texts).await?;

    let mut index = FlatIpIndex::new();
    for embedding in &embeddings {
        index.insert(embedding)?;
    }

    let document = DocumentInfo::new(
        filename.clone(),
        extracted.pages,
        extracted.content_hash,
        word_count,
        chunks.len() as u32,
    );

    let chunk_count = chunks.len();
    let pages = document.pages;
    state.replace_session(DocumentSession {
        document,
        chunks,
        index,
    });

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "indexed '{}': {} chunks in {}ms",
        filename,
        chunk_count,
        processing_time_ms
    );

    Ok(Json(UploadResponse {
        status: "ok".to_string(),
        chunk_count,
        filename,
        pages,
        processing_time_ms,
    }))
}
