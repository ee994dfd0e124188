//! Per-sample aircraft position classification.
//!
//! Each telemetry sample is classified independently against the airport
//! layout in a fixed priority order; there is no memory of the previous
//! area. All checks are linear in the number of features and cheap enough
//! to run every tick.

use crate::geo::GeoPoint;
use crate::layout::{AirportLayout, DEFAULT_CAPTURE_M, DEFAULT_RUNWAY_CAPTURE_M};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Altitude above which a fast aircraft is considered airborne.
const IN_FLIGHT_ALTITUDE_M: f64 = 500.0;
/// Speed above which a high aircraft is considered airborne (excludes fast
/// taxi operations and slow climb-out ambiguity).
const IN_FLIGHT_SPEED_MPS: f64 = 50.0;
/// Below this ground speed the aircraft is treated as stationary.
const STATIONARY_SPEED_MPS: f64 = 0.5;
/// How close to a stand center or taxiway centerline counts as "at/on" it.
const FEATURE_CAPTURE_M: f64 = 5.0;
/// Acceptable deviation from the runway heading, either direction of use.
const RUNWAY_HEADING_BAND_DEG: f64 = 45.0;

/// One live telemetry sample. Transient; not persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sample {
    pub position: GeoPoint,
    pub true_heading_deg: f64,
    pub ground_speed_mps: f64,
    pub altitude_m: f64,
}

/// Which airport feature (if any) the aircraft currently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AircraftArea {
    NotDetected,
    AtParking,
    OnTaxiway,
    AtHoldingPoint,
    OnRunway,
    InFlight,
}

/// Classification result for one sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionInfo {
    pub area: AircraftArea,
    /// Named feature (stand or holding point) when one applies.
    pub location: Option<String>,
    pub taxiway: Option<String>,
    pub runway: Option<String>,
    pub distance_to_center_m: Option<f64>,
    pub heading_deg: f64,
    pub speed_mps: f64,
}

impl PositionInfo {
    fn not_detected(sample: &Sample) -> Self {
        Self {
            area: AircraftArea::NotDetected,
            location: None,
            taxiway: None,
            runway: None,
            distance_to_center_m: None,
            heading_deg: sample.true_heading_deg,
            speed_mps: sample.ground_speed_mps,
        }
    }
}

/// Classifies samples against one airport layout. Read-only after
/// construction; safe to share across tasks without locking.
#[derive(Debug, Clone)]
pub struct PositionClassifier {
    layout: Arc<AirportLayout>,
}

impl PositionClassifier {
    pub fn new(layout: Arc<AirportLayout>) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &AirportLayout {
        &self.layout
    }

    /// Classify one sample. First matching check wins:
    /// in flight, at parking (stationary only), on taxiway, at holding
    /// point, on runway, otherwise not detected. Degenerate geometry
    /// degrades to "no match for this check", never an error.
    pub fn classify(&self, sample: &Sample) -> PositionInfo {
        let mut info = PositionInfo::not_detected(sample);
        let position = sample.position;
        let speed = sample.ground_speed_mps;

        if sample.altitude_m > IN_FLIGHT_ALTITUDE_M && speed > IN_FLIGHT_SPEED_MPS {
            info.area = AircraftArea::InFlight;
            return info;
        }

        // Parking only makes sense for an essentially stationary aircraft.
        if speed < STATIONARY_SPEED_MPS {
            if let Some(parking) = self.layout.nearest_parking(position, DEFAULT_CAPTURE_M) {
                if crate::geo::haversine_distance(parking.position, position) < FEATURE_CAPTURE_M {
                    info.area = AircraftArea::AtParking;
                    info.location = Some(parking.name.clone());
                    return info;
                }
            }
        }

        if speed > STATIONARY_SPEED_MPS {
            if let Some(fix) = self.layout.nearest_taxiway(position, DEFAULT_CAPTURE_M) {
                if fix.distance_m < FEATURE_CAPTURE_M {
                    info.area = AircraftArea::OnTaxiway;
                    info.taxiway = Some(fix.taxiway.name.clone());
                    info.distance_to_center_m = Some(fix.distance_m);
                    return info;
                }
            }

            if let Some(hp) = self.layout.holding_point_at(position, DEFAULT_RUNWAY_CAPTURE_M) {
                info.area = AircraftArea::AtHoldingPoint;
                info.location = Some(hp.name.clone());
                info.runway = Some(hp.runway.clone());
                return info;
            }

            for runway in &self.layout.runways {
                if !self.layout.is_on_runway(position, runway, DEFAULT_RUNWAY_CAPTURE_M) {
                    continue;
                }
                let distance_to_center = runway.distance_to_center(position);
                if distance_to_center >= runway.width_m / 2.0 {
                    continue;
                }
                // Either direction of use is accepted on the single strip.
                let heading_diff =
                    (sample.true_heading_deg - runway.heading()).rem_euclid(360.0);
                if heading_diff < RUNWAY_HEADING_BAND_DEG
                    || heading_diff > 360.0 - RUNWAY_HEADING_BAND_DEG
                    || (heading_diff - 180.0).abs() < RUNWAY_HEADING_BAND_DEG
                {
                    info.area = AircraftArea::OnRunway;
                    info.runway = Some(runway.name.clone());
                    info.distance_to_center_m = Some(distance_to_center);
                    return info;
                }
            }
        }

        info
    }
}

/// Human-readable one-line summary of a classification, for logs.
pub fn format_position_info(info: &PositionInfo) -> String {
    if info.area == AircraftArea::NotDetected {
        return "Aircraft position not detected".to_string();
    }

    let mut parts = vec![format!("Area: {:?}", info.area)];
    if let Some(location) = &info.location {
        parts.push(format!("Location: {location}"));
    }
    if let Some(taxiway) = &info.taxiway {
        parts.push(format!("Taxiway: {taxiway}"));
    }
    if let Some(runway) = &info.runway {
        parts.push(format!("Runway: {runway}"));
    }
    if let Some(distance) = info.distance_to_center_m {
        parts.push(format!("Distance to center: {distance:.2} m"));
    }
    parts.push(format!("Heading: {:.1}°", info.heading_deg));
    parts.push(format!("Speed: {:.1} m/s", info.speed_mps));
    parts.join(" | ")
}
