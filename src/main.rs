use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use zet_live::api::HttpFeedSource;
use zet_live::config::{Cli, Config};
use zet_live::poller::FeedPoller;
use zet_live::presenter::LogPresenter;
use zet_live::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from(&cli);
    config.trace_loaded();

    let source = HttpFeedSource::new(config.feed_url.clone(), config.fetch_timeout)?;
    tracing::info!(url = source.url(), "GTFS-RT client ready");
    let poller = Arc::new(FeedPoller::new(source, LogPresenter, &config));

    let app = server::router(AppState {
        vehicles: poller.vehicles(),
        status: poller.status(),
        refresh: poller.refresh_handle(),
    });
    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("Failed to bind {}", cli.listen))?;
    tracing::info!(addr = %cli.listen, "Serving vehicles at /api/vehicles");

    let polling = Arc::clone(&poller);
    tokio::select! {
        _ = polling.run() => {}
        served = axum::serve(listener, app) => {
            served.context("HTTP server failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
