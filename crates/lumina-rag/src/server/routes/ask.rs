//! Question answering endpoint: retrieve, prompt, generate, parse

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::generation::{
    answer_text, extract_json_span, resolve_sources, GenerateOptions, PromptBuilder,
};
use crate::server::state::AppState;
use crate::types::chat::AskRequest;
use crate::types::response::AskResponse;

/// POST /ask - answer a question about the uploaded document
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();

    let question = request.question.trim().to_string();
    if question.is_empty() {
        return Err(Error::EmptyQuestion);
    }
    if !state.has_document() {
        return Err(Error::NoDocument);
    }

    tracing::info!("question: {:?}", question);

    // Embed the query, then search the session index
    let query_embedding = state.embedding_provider().embed(&question).await?;
    let retrieved = state.retrieve(&query_embedding, state.config().retrieval.top_k)?;

    if retrieved.is_empty() {
        tracing::info!("no relevant chunks returned");
    } else {
        for (i, chunk) in retrieved.iter().enumerate() {
            tracing::debug!(
                "retrieved {} (chunk {}, score {:.3}): {:?}...",
                i + 1,
                chunk.index,
                chunk.score,
                crate::generation::truncate_chars(&chunk.content, 120)
            );
        }
    }

    let prompt = PromptBuilder::build_ask_prompt(&question, &retrieved, &request.history);
    tracing::debug!("built prompt of {} chars", prompt.len());

    let options = GenerateOptions::answering(&state.config().llm);
    let raw = state.llm_provider().generate(&prompt, &options).await?;
    if raw.trim().is_empty() {
        return Err(Error::EmptyModelResponse);
    }

    // Carve the reply into prose answer, optional JSON summary, and sources
    let span = extract_json_span(&raw);
    let answer = answer_text(&raw, span.as_ref());
    let sources = resolve_sources(span.as_ref().map(|s| &s.value), &raw, &retrieved);

    tracing::info!(
        "answered in {}ms ({} sources, structured: {})",
        start.elapsed().as_millis(),
        sources.len(),
        span.is_some()
    );

    Ok(Json(AskResponse {
        answer,
        structured: span.map(|s| s.value),
        sources,
        raw,
    }))
}
