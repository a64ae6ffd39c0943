// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use meme_gateway::{
    api::router,
    config::{Config, LogFormat, JWT_SECRET_ENV, NEXTAUTH_SECRET_ENV},
    state::AppState,
    telemetry::init_tracing,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the real environment takes precedence.
    dotenv::dotenv().ok();

    // Logging starts first so configuration warnings are recorded.
    let log_format = match LogFormat::from_env() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(log_format);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    if config.tokens.signing_secret.is_none() {
        tracing::warn!("{JWT_SECRET_ENV} is not set; logins will fail");
    }
    if config.tokens.verification_secrets.is_empty() {
        tracing::warn!(
            "neither {NEXTAUTH_SECRET_ENV} nor {JWT_SECRET_ENV} is set; authenticated routes will fail"
        );
    }

    let state = AppState::from_config(&config)?;
    tracing::info!(upstream = %state.memes.url(), "meme API configured");
    let app = router(state, &config.cors);

    let listener = TcpListener::bind(config.bind_target()).await?;
    let addr = listener.local_addr()?;
    tracing::info!("API listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
