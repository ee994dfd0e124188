//! Telemetry ingestion loop.
//!
//! Receives simulator telemetry datagrams, stores the latest sample, and
//! classifies it against the airport layout. Absence of telemetry is not an
//! error; the classifier simply has nothing to report yet.

use std::sync::Arc;
use tarmac_core::{format_position_info, AircraftArea, Sample};
use tokio::net::UdpSocket;
use tokio::sync::watch;

use crate::config::Config;
use crate::state::AppState;

pub async fn run_telemetry_loop(
    state: Arc<AppState>,
    config: Config,
    mut shutdown: watch::Receiver<bool>,
) {
    let addr = format!("127.0.0.1:{}", config.telemetry_port);
    let socket = match UdpSocket::bind(&addr).await {
        Ok(socket) => socket,
        Err(e) => {
            tracing::error!("Failed to bind telemetry socket on {}: {}", addr, e);
            return;
        }
    };
    tracing::info!("Telemetry loop listening on {}", addr);

    let mut buf = [0u8; 1024];
    let mut last_area: Option<AircraftArea> = None;

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!("Telemetry loop shutting down");
                    return;
                }
            }
            received = socket.recv_from(&mut buf) => {
                let (len, _) = match received {
                    Ok(received) => received,
                    Err(e) => {
                        tracing::error!("Telemetry receive error: {}", e);
                        continue;
                    }
                };

                let sample: Sample = match serde_json::from_slice(&buf[..len]) {
                    Ok(sample) => sample,
                    Err(e) => {
                        tracing::warn!("Ignoring malformed telemetry datagram: {}", e);
                        continue;
                    }
                };

                let info = state.ingest_sample(sample);
                tracing::debug!("{}", format_position_info(&info));
                if last_area != Some(info.area) {
                    tracing::info!("Aircraft area changed to {:?}", info.area);
                    last_area = Some(info.area);
                }
            }
        }
    }
}
