use anyhow::{Context, Result};
use clap::Parser;
use rustyroster::{api, config, logging, service::StudentService};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// In-memory student records service with LLM-written summaries.
#[derive(Parser)]
#[command(name = "rustyroster", version, about)]
struct Cli {
    /// Port to listen on (overrides `SERVER_PORT`).
    #[arg(long)]
    port: Option<u16>,
    /// Base URL of the Ollama runtime (overrides `OLLAMA_URL`).
    #[arg(long)]
    ollama_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::init_config()
        .context("failed to load configuration from environment")?
        .clone();
    logging::init_tracing();

    if let Some(port) = cli.port {
        config.server_port = port;
    }
    if let Some(url) = cli.ollama_url {
        config.ollama_url = url;
    }

    let service = StudentService::from_config(&config).context("failed to build student service")?;
    let app = api::create_router(Arc::new(service));

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.server_port))
        .await
        .with_context(|| format!("failed to bind port {}", config.server_port))?;
    tracing::info!("Listening on http://0.0.0.0:{}", config.server_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
