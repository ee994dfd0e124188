//! ATC controller loop.
//!
//! Each tick, surfaces the next scripted ATC prompt when it changes, and
//! drains inbound pilot-response datagrams. A matched response delivers the
//! next scripted action; an unmatched one delivers a standby placeholder.

use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::time::interval;

use crate::config::Config;
use crate::radio::RadioSender;
use crate::state::AppState;

/// Inbound pilot-response event.
#[derive(Debug, Deserialize)]
struct PilotMessage {
    message: String,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default)]
    callsign: Option<String>,
}

pub async fn run_controller_loop(
    state: Arc<AppState>,
    config: Config,
    radio: RadioSender,
    mut shutdown: watch::Receiver<bool>,
) {
    let addr = format!("127.0.0.1:{}", config.pilot_port);
    let socket = match UdpSocket::bind(&addr).await {
        Ok(socket) => socket,
        Err(e) => {
            tracing::error!("Failed to bind pilot-message socket on {}: {}", addr, e);
            return;
        }
    };
    tracing::info!("Controller loop listening on {}", addr);

    let mut ticker = interval(Duration::from_millis(config.tick_ms));
    let mut buf = [0u8; 1024];
    let mut last_prompt: Option<String> = None;

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!("Controller loop shutting down");
                    return;
                }
            }
            _ = ticker.tick() => {
                let prompt = state.next_message();
                if prompt != last_prompt {
                    if let Some(message) = &prompt {
                        tracing::info!("Next scripted exchange: {}", message);
                    }
                    last_prompt = prompt;
                }
            }
            received = socket.recv_from(&mut buf) => {
                let (len, _) = match received {
                    Ok(received) => received,
                    Err(e) => {
                        tracing::error!("Pilot-message receive error: {}", e);
                        continue;
                    }
                };

                let pilot: PilotMessage = match serde_json::from_slice(&buf[..len]) {
                    Ok(pilot) => pilot,
                    Err(e) => {
                        tracing::warn!("Ignoring malformed pilot message: {}", e);
                        continue;
                    }
                };

                let Some(result) = state.handle_pilot_message(
                    &pilot.message,
                    pilot.frequency.as_deref(),
                    pilot.callsign.as_deref(),
                ) else {
                    continue;
                };

                if result.matched {
                    if let Some((atc_state, status)) = state.radio_state() {
                        tracing::info!(
                            "Processed pilot message '{}' -> {:?}/{:?}",
                            pilot.message, atc_state, status
                        );
                    }
                } else {
                    tracing::info!("Could not process pilot message '{}', standing by", pilot.message);
                }

                if let Some(outbound) = result.outbound {
                    radio.send(&outbound).await;
                }
            }
        }
    }
}
