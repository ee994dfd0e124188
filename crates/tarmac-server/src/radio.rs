//! Outbound radio sink.
//!
//! ATC messages go out as UDP datagrams to the radio display. Delivery is
//! best-effort: the state machine has already advanced by the time a message
//! is sent, so failures are logged and never fed back into state logic.

use serde::Serialize;
use std::net::SocketAddr;
use tarmac_core::{AtcState, RadioMessage};
use tokio::net::UdpSocket;

#[derive(Serialize)]
struct RadioDatagram<'a> {
    timestamp: String,
    message: &'a str,
    state: AtcState,
    frequency: &'a str,
}

pub struct RadioSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl RadioSender {
    pub async fn new(radio_port: u16) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let target = SocketAddr::from(([127, 0, 0, 1], radio_port));
        Ok(Self { socket, target })
    }

    pub async fn send(&self, message: &RadioMessage) {
        let datagram = RadioDatagram {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            message: &message.message,
            state: message.state,
            frequency: &message.frequency,
        };

        let payload = match serde_json::to_vec(&datagram) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to encode radio message: {}", e);
                return;
            }
        };

        if let Err(e) = self.socket.send_to(&payload, self.target).await {
            tracing::error!("Failed to send radio message to {}: {}", self.target, e);
        } else {
            tracing::debug!("Radio [{}]: {}", message.frequency, message.message);
        }
    }
}
