//! Ollama client: HTTP API with a command-line fallback
//!
//! The HTTP API is tried first. When it is unreachable (or returns nothing)
//! and the fallback is enabled, the prompt is piped to `ollama run <model>`
//! instead. The CLI path does not support sampling options.

use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

/// Sampling options forwarded to /api/generate
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub num_predict: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.9,
            top_k: 40,
            num_predict: 512,
        }
    }
}

impl GenerateOptions {
    /// Options for answering document questions, from the service config.
    /// Looser sampling than the default so the model can elaborate.
    pub fn answering(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            num_predict: config.max_tokens,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: &'a GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

/// Client for a local Ollama server
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    generate_model: String,
    embed_model: String,
    timeout: Duration,
    cli_fallback: bool,
}

impl OllamaClient {
    /// Create a new client from config
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            generate_model: config.generate_model.clone(),
            embed_model: config.embed_model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            cli_fallback: config.cli_fallback,
        }
    }

    /// Generate a completion, preferring the HTTP API
    pub async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        match self.generate_api(prompt, options).await {
            Ok(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            Ok(_) => {
                if self.cli_fallback {
                    tracing::warn!("Ollama API returned empty output, trying CLI fallback");
                    self.generate_cli(prompt).await
                } else {
                    Err(Error::EmptyModelResponse)
                }
            }
            Err(e) => {
                if self.cli_fallback {
                    tracing::warn!("Ollama API failed ({}), trying CLI fallback", e);
                    self.generate_cli(prompt).await
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn generate_api(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        let request = GenerateRequest {
            model: &self.generate_model,
            prompt,
            stream: false,
            options,
        };

        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }

    /// Fallback: pipe the prompt to `ollama run <model>` on stdin
    async fn generate_cli(&self, prompt: &str) -> Result<String> {
        let mut child = Command::new("ollama")
            .arg("run")
            .arg(&self.generate_model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Llm(format!("failed to spawn ollama: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .map_err(|e| Error::Llm(format!("failed to write prompt: {}", e)))?;
            // Dropping stdin closes the pipe so ollama sees EOF
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| Error::Llm("ollama subprocess timed out".to_string()))?
            .map_err(|e| Error::Llm(format!("ollama subprocess failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Llm(format!(
                "ollama exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(Error::EmptyModelResponse);
        }
        Ok(text)
    }

    /// Embed a single text via /api/embeddings
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.embed_model,
            prompt: text,
        };

        let response = self
            .http
            .post(format!("{}/api/embeddings", self.base_url))
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: EmbeddingResponse = response.json().await?;
        if body.embedding.is_empty() {
            return Err(Error::Embedding(format!(
                "model {} returned an empty embedding",
                self.embed_model
            )));
        }
        Ok(body.embedding)
    }

    /// Check whether the Ollama server is reachable
    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        Ok(matches!(response, Ok(r) if r.status().is_success()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_has_ollama_wire_shape() {
        let options = GenerateOptions::default();
        let request = GenerateRequest {
            model: "llama3:8b-instruct-q4_K_M",
            prompt: "Say hello",
            stream: false,
            options: &options,
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["model"], "llama3:8b-instruct-q4_K_M");
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["num_predict"], 512);
        assert!((value["options"]["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn answering_options_come_from_config() {
        let config = LlmConfig::default();
        let options = GenerateOptions::answering(&config);
        assert!((options.temperature - 0.6).abs() < 1e-6);
        assert_eq!(options.num_predict, 700);
        assert!((options.top_p - 0.95).abs() < 1e-6);
        assert_eq!(options.top_k, 40);
    }

    #[test]
    fn missing_response_field_deserializes_empty() {
        let body: GenerateResponse = serde_json::from_str("{}").expect("deserialize");
        assert!(body.response.is_empty());

        let body: EmbeddingResponse =
            serde_json::from_str(r#"{"embedding": [0.5, -0.25]}"#).expect("deserialize");
        assert_eq!(body.embedding, vec![0.5, -0.25]);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = LlmConfig {
            base_url: "http://localhost:11434/".to_string(),
            ..LlmConfig::default()
        };
        let client = OllamaClient::new(&config);
        assert_eq!(client.base_url, "http://localhost:11434");
    }
}
