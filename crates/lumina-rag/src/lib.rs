//! lumina-rag: retrieval-augmented chat over a single uploaded PDF
//!
//! This crate provides a small RAG service: a PDF is uploaded, split into
//! overlapping word windows, embedded via a local Ollama server, and indexed
//! in a flat inner-product index. Questions are answered by retrieving the
//! most similar chunks, assembling a soft-RAG prompt (the model may also use
//! general knowledge) together with recent conversation history, and parsing
//! the model's mixed natural-language/JSON reply into a structured response.

pub mod config;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    chat::{AskRequest, ChatTurn, Role},
    document::{Chunk, DocumentInfo},
    response::{AskResponse, GreetResponse, UploadResponse},
};
