use clap::Parser;
use ollama_proxy::config::config_search_paths;
use ollama_proxy::{build_router, AppState, ProxyConfig, SharedJournal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "ollama-proxy",
    about = "Serve the Anthropic Messages API on top of a local Ollama backend",
    version
)]
struct Cli {
    /// Path to config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Backend base URL, e.g. http://localhost:11434/v1 (overrides config and OLLAMA_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Request journal path (JSONL)
    #[arg(long, default_value = "ollama-proxy.log")]
    log_file: PathBuf,

    /// Print config search paths and exit
    #[arg(long)]
    show_config_paths: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ollama_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if cli.show_config_paths {
        println!("Config search paths:");
        for (i, path) in config_search_paths().iter().enumerate() {
            println!("  {}. {}", i + 1, path.display());
        }
        println!("  (built-in defaults if none exist)");
        return Ok(());
    }

    let mut config = ProxyConfig::find_and_load(cli.config.as_deref())?;
    config.apply_env_overrides();

    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
    }
    config.validate()?;

    let journal = SharedJournal::open(&cli.log_file)?;

    info!("ollama-proxy v{}", env!("CARGO_PKG_VERSION"));
    info!("  Backend:   {}", config.backend.chat_completions_url());
    info!("  Timeout:   {}s", config.backend.timeout_secs);
    info!("  Port:      {}", config.port);
    info!("  Models:    {} mapped", config.models.len());
    info!("  Journal:   {}", cli.log_file.display());
    if config.models.is_empty() {
        warn!("Model table is empty; every model name is sent to the backend unchanged");
    }

    journal.info(
        "startup",
        format!(
            "Starting ollama-proxy base_url={} port={} models={}",
            config.backend.base_url,
            config.port,
            config.models.len()
        ),
    );

    let client = config.backend.build_client()?;

    let port = config.port;
    let state = Arc::new(AppState {
        config,
        client,
        journal,
    });

    let app = build_router(state);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Listening on http://{}", bind_addr);
    info!("  ANTHROPIC_BASE_URL=http://localhost:{} claude", port);

    axum::serve(listener, app).await?;

    Ok(())
}
