// loan-document-service/src/main.rs

mod assets;
mod config;
mod error;
mod generators;
mod http;
mod models;
mod pipeline;
mod renderers;

use crate::config::Config;
use crate::http::AppState;
use crate::pipeline::DocumentPipeline;
use crate::renderers::ChromePdfEngine;
use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Print to stderr BEFORE logging initialization to catch early failures
    eprintln!("Starting loan-document-service...");

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("FATAL: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.service.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        service = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting Loan Document Service"
    );

    let engine = Arc::new(ChromePdfEngine::new(config.browser.clone()));
    let pipeline = DocumentPipeline::new(&config, engine)
        .context("Failed to initialise document pipeline")?;

    let app = http::router(AppState {
        pipeline: Arc::new(pipeline),
        service_name: config.service.name.clone(),
    });

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(
        address = %address,
        max_concurrent_browsers = config.browser.max_concurrent,
        inline_images = config.assets.inline_images,
        "HTTP server listening"
    );

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal, draining requests");
                cancel_for_signal.cancel();
            }
            Err(err) => {
                error!("Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("HTTP server terminated unexpectedly")?;

    info!("HTTP server exited");
    Ok(())
}
