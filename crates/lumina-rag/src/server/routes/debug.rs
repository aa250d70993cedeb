//! Debug endpoints for inspecting the session and the model

use axum::{extract::State, Json};

use crate::error::Result;
use crate::generation::GenerateOptions;
use crate::server::state::AppState;
use crate::types::response::{DebugChunksResponse, ModelCheckResponse};

/// Chunks shown by /debug/chunks
const PREVIEW_COUNT: usize = 10;

/// Canned prompt for /debug/model
const TEST_PROMPT: &str = "What is 2+2? Answer with just the number.";

/// GET /debug/chunks - preview the indexed chunks
pub async fn debug_chunks(State(state): State<AppState>) -> Result<Json<DebugChunksResponse>> {
    let (total_chunks, chunks_preview) = state.chunk_previews(PREVIEW_COUNT)?;
    Ok(Json(DebugChunksResponse {
        total_chunks,
        chunks_preview,
    }))
}

/// GET /debug/model - send a canned prompt and report whether the model answers
pub async fn debug_model(State(state): State<AppState>) -> Json<ModelCheckResponse> {
    let response = state
        .llm_provider()
        .generate(TEST_PROMPT, &GenerateOptions::default())
        .await
        .ok();

    let working = response
        .as_deref()
        .map(|r| !r.trim().is_empty())
        .unwrap_or(false);

    Json(ModelCheckResponse {
        model: state.llm_provider().model().to_string(),
        prompt: TEST_PROMPT.to_string(),
        response,
        working,
    })
}
