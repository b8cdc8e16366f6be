// ABOUTME: Server binary wiring configuration, storage, service, and HTTP routes
// ABOUTME: Binds the axum router and serves until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Workout Tracker Server Binary

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use workout_tracker::{
    config::ServerConfig, logging, routes::server_router, service::WorkoutService,
    store::SqliteStore,
};

#[derive(Parser)]
#[command(name = "workout-tracker-server")]
#[command(about = "Personal fitness tracking backend")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    info!("Starting workout tracker: {}", config.summary());

    let store = Arc::new(SqliteStore::new(&config.database_url).await?);
    info!("Document store initialized");

    let service = Arc::new(WorkoutService::new(store));
    let app = server_router(service);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {err}");
    }
    info!("Shutdown signal received");
}
