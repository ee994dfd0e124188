//! CLI tool to send one pilot-response datagram to the Tarmac server.

use clap::Parser;
use std::net::UdpSocket;

/// Send a pilot response to the ATC controller
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// The spoken/typed pilot response, e.g. "Requesting pushback, OE-LBT"
    message: String,

    /// Radio frequency the response is transmitted on
    #[arg(long)]
    frequency: Option<String>,

    /// Aircraft callsign
    #[arg(long)]
    callsign: Option<String>,

    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Pilot-message port
    #[arg(long, default_value_t = 49004)]
    port: u16,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let payload = serde_json::json!({
        "message": args.message,
        "frequency": args.frequency,
        "callsign": args.callsign,
    });

    let socket = UdpSocket::bind("127.0.0.1:0")?;
    let target = format!("{}:{}", args.host, args.port);
    socket.send_to(payload.to_string().as_bytes(), &target)?;

    println!("Sent pilot message to {}: {}", target, args.message);
    Ok(())
}
