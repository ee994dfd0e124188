//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the airport layout JSON file.
    pub layout_path: String,
    /// Port for inbound simulator telemetry datagrams.
    pub telemetry_port: u16,
    /// Port for inbound pilot-response datagrams.
    pub pilot_port: u16,
    /// Port the radio display listens on for outbound ATC messages.
    pub radio_port: u16,
    /// Controller loop tick interval in milliseconds.
    pub tick_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            layout_path: env::var("TARMAC_LAYOUT")
                .unwrap_or_else(|_| "airport_data/lowg_airport.json".to_string()),
            telemetry_port: env::var("TARMAC_TELEMETRY_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(49002),
            pilot_port: env::var("TARMAC_PILOT_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(49004),
            radio_port: env::var("TARMAC_RADIO_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(49003),
            tick_ms: env::var("TARMAC_TICK_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
        }
    }
}
