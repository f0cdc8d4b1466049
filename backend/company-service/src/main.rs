/// Company Service Main Entry Point
///
/// Loads settings, builds the token engine and access gate, and serves gRPC
/// until Ctrl+C or SIGTERM.
use anyhow::{Context, Result};
use company_service::{config::Settings, server, server::AppState, telemetry};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Settings first: they carry the log configuration
    let settings = Settings::load().context("Failed to load configuration")?;
    telemetry::init_tracing(&settings.log).context("Failed to initialize tracing")?;

    info!("Starting Company Service");

    settings.validate().context("Invalid configuration")?;
    info!(?settings, "Configuration loaded successfully");

    let state = AppState::from_settings(&settings).context("Failed to initialize token engine")?;

    let addr = settings.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Starting gRPC server on {}", addr);

    if let Err(e) = server::serve(listener, state, shutdown_signal()).await {
        error!("gRPC server error: {}", e);
        return Err(e.into());
    }

    info!("Company Service shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
