//! Chat server binary
//!
//! Run with: cargo run -p lumina-rag --bin lumina-server [config.toml]

use lumina_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lumina_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                          Lumina                           ║
║              Chat with your uploaded PDF                  ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Config path from argv, then env, else defaults
    let config = match std::env::args().nth(1).or_else(|| std::env::var("LUMINA_CONFIG").ok()) {
        Some(path) => {
            tracing::info!("loading configuration from {}", path);
            RagConfig::load(&path)?
        }
        None => RagConfig::default(),
    };

    tracing::info!("configuration loaded");
    tracing::info!("  - embedding model: {}", config.llm.embed_model);
    tracing::info!("  - generation model: {}", config.llm.generate_model);
    tracing::info!(
        "  - chunking: {} words per chunk, {} overlap",
        config.chunking.chunk_size,
        config.chunking.overlap
    );
    tracing::info!("  - retrieval: top {} chunks", config.retrieval.top_k);

    // Check Ollama availability up front
    tracing::info!("checking Ollama at {}...", config.llm.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Please start Ollama:");
            tracing::warn!("  1. Start: ollama serve");
            tracing::warn!(
                "  2. Pull models: ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.generate_model
            );
        }
    }

    let server = RagServer::new(config);

    println!("\nServer starting...");
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /upload  - Upload a PDF");
    println!("  POST /ask     - Ask questions about it");
    println!("  GET  /greet   - Model-generated welcome");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
