//! faktory_exporter
//!
//! Serves Faktory `INFO` statistics as Prometheus metrics:
//! - `<telemetry-path>`: one scrape per request
//! - `/`: landing page
//! - graceful shutdown on SIGINT / SIGTERM

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use faktory_exporter::{app_state::AppState, config, router};
use faktory_exporter_core::{ExporterError, Result};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = config::Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "faktory_exporter failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: config::Cli) -> Result<()> {
    let cfg = config::resolve(&cli)?;
    let listen = cfg.web.listen_addr()?;
    let telemetry_path = cfg.web.telemetry_path.clone();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting faktory_exporter");

    let state = AppState::connect(cfg).await?;
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen.as_str())
        .await
        .map_err(|e| ExporterError::Config(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, %telemetry_path, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ExporterError::Config(format!("http server failed: {e}")))?;

    tracing::info!("see you next time");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl-c handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::warn!("shutdown signal received, exiting gracefully");
}
