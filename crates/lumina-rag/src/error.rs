//! Error types for the RAG service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the RAG pipeline and HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Empty question")]
    EmptyQuestion,

    #[error("No PDF uploaded yet")]
    NoDocument,

    #[error("No text found in PDF")]
    EmptyDocument,

    #[error("PDF parse failed: {0}")]
    Pdf(String),

    #[error("multipart error: {0}")]
    Multipart(String),

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("No response from LLM (check the Ollama server)")]
    EmptyModelResponse,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFile
            | Self::EmptyQuestion
            | Self::NoDocument
            | Self::EmptyDocument
            | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::EmptyModelResponse | Self::Llm(_) | Self::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(Error::MissingFile.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::EmptyQuestion.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::NoDocument.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn model_errors_map_to_502() {
        assert_eq!(Error::EmptyModelResponse.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(Error::Llm("down".into()).status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn everything_else_is_500() {
        let err = Error::DimensionMismatch { expected: 768, actual: 384 };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            Error::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_match_api_contract() {
        assert_eq!(Error::NoDocument.to_string(), "No PDF uploaded yet");
        assert_eq!(Error::MissingFile.to_string(), "No file uploaded");
    }
}
