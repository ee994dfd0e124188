//! Telemetry simulator: taxi an aircraft along a waypoint path.
//!
//! Emits one telemetry datagram per tick to the server's telemetry port,
//! following the path at constant ground speed. Useful for exercising the
//! classifier and the ATC script without a running simulator.

use anyhow::Context;
use clap::Parser;
use tarmac_cli::TaxiPath;
use tarmac_core::{geo, GeoPoint, Sample};
use tokio::net::UdpSocket;
use tokio::time::{interval, Duration, Instant};

/// Simulate a taxiing aircraft and stream telemetry to the server
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Waypoint as "lat,lon"; repeat for each point (at least two)
    #[arg(long = "waypoint", value_parser = parse_waypoint, required = true, num_args = 1..)]
    waypoints: Vec<GeoPoint>,

    /// Ground speed in m/s
    #[arg(long, default_value_t = 8.0)]
    speed: f64,

    /// Telemetry ticks per second
    #[arg(long, default_value_t = 1.0)]
    rate: f64,

    /// Reported altitude in meters MSL
    #[arg(long, default_value_t = 340.0)]
    altitude: f64,

    /// Random position jitter radius in meters
    #[arg(long, default_value_t = 0.0)]
    jitter_m: f64,

    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Telemetry port
    #[arg(long, default_value_t = 49002)]
    port: u16,
}

fn parse_waypoint(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got {s:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
    Ok(GeoPoint { lat, lon })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    anyhow::ensure!(args.rate > 0.0, "rate must be positive");

    let path = TaxiPath::new(args.waypoints.clone(), args.speed)?;
    let target = format!("{}:{}", args.host, args.port);
    let socket = UdpSocket::bind("127.0.0.1:0")
        .await
        .context("binding local UDP socket")?;

    println!(
        "Taxiing {:.0} m at {:.1} m/s ({:.0} s) -> {}",
        path.length_m(),
        path.speed_mps(),
        path.duration_s(),
        target
    );

    let mut ticker = interval(Duration::from_secs_f64(1.0 / args.rate));
    let start = Instant::now();

    loop {
        ticker.tick().await;
        let t = start.elapsed().as_secs_f64();
        let (mut position, heading) = path.position_at(t);

        if args.jitter_m > 0.0 {
            use rand::Rng;
            let mut rng = rand::rng();
            let bearing = rng.random_range(0.0..360.0);
            let dist = rng.random_range(0.0..args.jitter_m);
            position = geo::offset_by_bearing(position, dist, bearing);
        }

        let done = t >= path.duration_s();
        let sample = Sample {
            position,
            true_heading_deg: heading,
            ground_speed_mps: if done { 0.0 } else { args.speed },
            altitude_m: args.altitude,
        };
        let payload = serde_json::to_string(&sample)?;
        socket.send_to(payload.as_bytes(), &target).await?;

        if done {
            println!("Arrived at final waypoint, stopping.");
            break;
        }
    }

    Ok(())
}
