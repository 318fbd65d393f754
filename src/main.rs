// nano-banana-editor - Natural-language photo editing backed by Gemini
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use nano_banana_editor::cli::{self, Args, Command};
use nano_banana_editor::config::AppConfig;
use nano_banana_editor::gemini::GeminiClient;
use nano_banana_editor::server::create_router;
use nano_banana_editor::session::SessionController;
use nano_banana_editor::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(&path.to_string_lossy())?,
        None => AppConfig::load()?,
    };
    args.apply(&mut config);

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting nano-banana-editor v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build the Gemini client once and inject it
    let api_key = config.require_api_key()?.clone();
    let gemini_client = GeminiClient::new(&config.gemini, api_key)?;
    info!("Using model {} at {}", gemini_client.model(), gemini_client.base_url());

    let controller = SessionController::new(Arc::new(gemini_client), config.limits.max_upload_bytes);

    match args.command.clone().unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Edit {
            input,
            prompts,
            output,
        } => {
            let path = cli::run_edit(&controller, &input, &prompts, output.as_deref()).await?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Serve { .. } => serve(config, controller).await,
    }
}

async fn serve(config: AppConfig, controller: SessionController) -> Result<()> {
    let app = create_router(config.clone(), controller)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
