//! Greeting endpoint

use axum::{extract::State, Json};

use crate::generation::{GenerateOptions, PromptBuilder};
use crate::server::state::AppState;
use crate::types::response::GreetResponse;

/// Served when the model is unreachable
const FALLBACK_GREETING: &str = "\u{1F44B} Hi! Upload a PDF to get started.";

/// GET /greet - ask the model for a short welcome message
pub async fn greet(State(state): State<AppState>) -> Json<GreetResponse> {
    let greeting = match state
        .llm_provider()
        .generate(PromptBuilder::greeting_prompt(), &GenerateOptions::default())
        .await
    {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => FALLBACK_GREETING.to_string(),
        Err(e) => {
            tracing::warn!("greeting generation failed: {}", e);
            FALLBACK_GREETING.to_string()
        }
    };

    Json(GreetResponse { greeting })
}
