//! Route table for the chat service

pub mod ask;
pub mod debug;
pub mod greet;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build the application routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload gets a larger body limit for PDFs
        .route(
            "/upload",
            post(upload::upload_pdf).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/ask", post(ask::ask))
        .route("/greet", get(greet::greet))
        // Debug endpoints
        .route("/debug/chunks", get(debug::debug_chunks))
        .route("/debug/model", get(debug::debug_model))
}
