//! Tarmac CLI - command line tools for the ground-traffic system.
//!
//! This crate provides the CLI binaries:
//! - send_pilot_message: send one pilot-response datagram to the server
//! - taxi_track: simulated taxiing aircraft telemetry sender
//! - extract_taxiway: recorder-CSV to taxiway-segment JSON converter

pub mod sim;

pub use sim::TaxiPath;
