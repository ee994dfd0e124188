//! Simulated ground-track implementations.

use tarmac_core::geo::{haversine_distance, initial_bearing, offset_by_bearing, GeoPoint};

/// Constant-speed path along an ordered list of waypoints on the ground.
pub struct TaxiPath {
    waypoints: Vec<GeoPoint>,
    speed_mps: f64,
    /// Cumulative distance from the first waypoint to each waypoint.
    cumulative_m: Vec<f64>,
}

impl TaxiPath {
    /// Create a taxi path. Needs at least two waypoints.
    pub fn new(waypoints: Vec<GeoPoint>, speed_mps: f64) -> anyhow::Result<Self> {
        if waypoints.len() < 2 {
            anyhow::bail!("taxi path needs at least two waypoints");
        }
        if speed_mps <= 0.0 {
            anyhow::bail!("taxi speed must be positive");
        }

        let mut cumulative_m = vec![0.0];
        for pair in waypoints.windows(2) {
            let last = *cumulative_m.last().unwrap_or(&0.0);
            cumulative_m.push(last + haversine_distance(pair[0], pair[1]));
        }

        Ok(Self { waypoints, speed_mps, cumulative_m })
    }

    /// Total path length in meters.
    pub fn length_m(&self) -> f64 {
        *self.cumulative_m.last().unwrap_or(&0.0)
    }

    /// Seconds needed to taxi the whole path.
    pub fn duration_s(&self) -> f64 {
        self.length_m() / self.speed_mps
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_mps
    }

    /// Position and heading at `t` seconds from the start. Clamps to the
    /// endpoints outside the path duration.
    pub fn position_at(&self, t: f64) -> (GeoPoint, f64) {
        let travelled = (t.max(0.0) * self.speed_mps).min(self.length_m());

        // Find the leg containing the travelled distance.
        let mut leg = 0;
        while leg + 1 < self.cumulative_m.len() - 1 && self.cumulative_m[leg + 1] <= travelled {
            leg += 1;
        }

        let start = self.waypoints[leg];
        let end = self.waypoints[leg + 1];
        let heading = initial_bearing(start, end);
        let along = travelled - self.cumulative_m[leg];
        (offset_by_bearing(start, along, heading), heading)
    }
}
