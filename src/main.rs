//! MediumChat - Entry Point
//!
//! Starts the TCP listener, the ChatServer actor and the admin console.

use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mediumchat::{run_console, serve, spawn_line_reader, Config, ServerHandle};

/// Channel buffer size for server commands
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=mediumchat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mediumchat=info")),
        )
        .init();

    let config = Config::parse();

    let listener = match TcpListener::bind(&config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.addr, "Failed to create listener: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("MediumChat listening on {}", config.addr);

    let server = ServerHandle::spawn(CHANNEL_BUFFER_SIZE, config.max_clients);
    info!("ChatServer actor started");

    if !config.no_console {
        let server = server.clone();
        let lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
        tokio::spawn(async move {
            if let Err(e) = run_console(lines, server).await {
                error!("Console stopped: {}", e);
            }
        });
    }

    tokio::select! {
        result = serve(listener, server) => {
            if let Err(e) = result {
                error!("Failed to accept connection: {}", e);
            }
            ExitCode::FAILURE
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received, closing listener");
            ExitCode::SUCCESS
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
