//! Tarmac server - ground-traffic awareness and scripted ATC radio exchanges

mod config;
mod loops;
mod radio;
mod state;

use anyhow::{Context, Result};
use std::sync::Arc;
use tarmac_core::AirportLayout;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::radio::RadioSender;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("tarmac_server=debug".parse()?))
        .init();

    tracing::info!("Starting Tarmac server...");

    let config = Config::from_env();
    let layout = AirportLayout::load(&config.layout_path)
        .with_context(|| format!("loading airport layout from {}", config.layout_path))?;
    tracing::info!("Loaded airport layout for {} ({})", layout.name, layout.icao);

    let state = Arc::new(AppState::new(layout));
    if let Some((atc_state, status)) = state.radio_state() {
        tracing::info!("Initial radio state {:?}, aircraft status {:?}", atc_state, status);
    }

    let radio = RadioSender::new(config.radio_port).await?;

    // Cooperative shutdown: flip the flag, loops observe it and return.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let telemetry = tokio::spawn(loops::telemetry_loop::run_telemetry_loop(
        state.clone(),
        config.clone(),
        shutdown_rx.clone(),
    ));
    let controller = tokio::spawn(loops::controller_loop::run_controller_loop(
        state,
        config,
        radio,
        shutdown_rx,
    ));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(true);

    let _ = telemetry.await;
    let _ = controller.await;

    Ok(())
}
