//! Build taxiway segments from a flight-recorder GPS log.
//!
//! Taxi a real (or simulated) aircraft along a taxiway with the recorder
//! running, then feed the log through this tool to get the `segments`
//! array for a taxiway entry in the airport layout file. Points are kept
//! only while the aircraft moves at taxi speed, then decimated so the
//! resulting polyline stays manageable.

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

/// Extract taxiway centerline segments from a recorder GPS log
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Recorder log with "latitude=.., longitude=.., ground_speed=.." lines
    input: PathBuf,

    /// Keep every Nth taxi-speed point
    #[arg(long, default_value_t = 10)]
    every: usize,

    /// Segment width in meters written to the output
    #[arg(long, default_value_t = 30.0)]
    width: f64,

    /// Minimum ground speed (m/s) for a point to count as taxiing
    #[arg(long, default_value_t = 3.0)]
    min_speed: f64,

    /// Maximum ground speed (m/s) for a point to count as taxiing
    #[arg(long, default_value_t = 15.0)]
    max_speed: f64,
}

/// Pull a `key=<number>` value out of a recorder line.
fn field(line: &str, key: &str) -> Option<f64> {
    let start = line.find(key)? + key.len();
    let rest = line[start..].trim_start_matches('=');
    let end = rest
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-')
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    anyhow::ensure!(args.every > 0, "--every must be at least 1");

    let file = File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;

    let mut points: Vec<(f64, f64)> = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let (lat, lon, speed) = match (
            field(&line, "latitude"),
            field(&line, "longitude"),
            field(&line, "ground_speed"),
        ) {
            (Some(lat), Some(lon), Some(speed)) => (lat, lon, speed),
            _ => continue,
        };
        if speed > args.min_speed && speed < args.max_speed {
            points.push((lat, lon));
        }
    }

    let reduced: Vec<&(f64, f64)> = points.iter().step_by(args.every).collect();
    anyhow::ensure!(
        reduced.len() >= 2,
        "only {} taxi-speed points found, need at least 2",
        reduced.len()
    );

    let segments: Vec<serde_json::Value> = reduced
        .windows(2)
        .map(|pair| {
            serde_json::json!({
                "start": [round6(pair[0].0), round6(pair[0].1)],
                "end": [round6(pair[1].0), round6(pair[1].1)],
                "width": args.width,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&segments)?);
    Ok(())
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}
