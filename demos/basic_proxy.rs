//! Start an ollama-proxy server programmatically.
//!
//! Usage:
//!   OLLAMA_BASE_URL=http://localhost:11434/v1 cargo run --example basic_proxy

use ollama_proxy::{build_router, AppState, ProxyConfig, SharedJournal};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut config = ProxyConfig::find_and_load(None)?;
    config.apply_env_overrides();
    config.validate()?;

    println!("Backend: {}", config.backend.chat_completions_url());
    println!("Models mapped: {}", config.models.len());

    let journal = SharedJournal::open("proxy-example.log")?;
    let client = config.backend.build_client()?;

    let port = config.port;
    let state = Arc::new(AppState {
        config,
        client,
        journal,
    });

    let app = build_router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("Listening on http://{}", addr);
    println!();
    println!("  ANTHROPIC_BASE_URL=http://localhost:{} claude", port);

    axum::serve(listener, app).await?;
    Ok(())
}
