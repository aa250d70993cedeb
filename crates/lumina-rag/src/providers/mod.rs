//! Provider abstractions for embeddings and LLM generation
//!
//! The traits are the seam between the request handlers and the model
//! backend; the only shipped implementation talks to a local Ollama server.

pub mod embedding;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::{OllamaEmbedder, OllamaLlm, OllamaProvider};
