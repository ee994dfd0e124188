//! End-to-end classification tests over a code-built fixture airport.

use tarmac_core::{AircraftArea, AirportLayout, GeoPoint, PositionClassifier, Sample};
use std::sync::Arc;

/// Fixture airport: runway "27" running east-west at lat 46.99, a
/// three-segment taxiway "D" along lat 47.00, a stand a few meters off the
/// taxiway centerline, and a holding point short of the runway.
fn fixture() -> PositionClassifier {
    let layout = AirportLayout::from_json_str(
        r#"{
            "name": "Test Field",
            "icao": "TEST",
            "runways": [
                {
                    "name": "27",
                    "threshold1_coords": [46.9900, 15.4200],
                    "threshold2_coords": [46.9900, 15.4500],
                    "width": 45,
                    "length": 2280
                }
            ],
            "taxiways": [
                {
                    "name": "D",
                    "segments": [
                        {"start": [47.0000, 15.4300], "end": [47.0000, 15.4320], "width": 30},
                        {"start": [47.0000, 15.4320], "end": [47.0000, 15.4340], "width": 30},
                        {"start": [47.0000, 15.4340], "end": [47.0000, 15.4360], "width": 30}
                    ]
                }
            ],
            "parking_positions": [
                {
                    "name": "Stand 5",
                    "coords": [47.00003, 15.4300],
                    "type": "Commercial",
                    "elevation": 340.0,
                    "heading": 90.0,
                    "size": 36.0
                }
            ],
            "holding_points": [
                {
                    "name": "D1",
                    "coords": [46.9950, 15.4300],
                    "associated_with": "27"
                }
            ],
            "radio_frequencies": {
                "ground": {"name": "Test Ground", "frequency": "121.600", "description": ""},
                "tower": {"name": "Test Tower", "frequency": "118.100", "description": ""},
                "departure": {"name": "Test Departure", "frequency": "126.100", "description": ""}
            }
        }"#,
    )
    .unwrap();
    PositionClassifier::new(Arc::new(layout))
}

fn sample(lat: f64, lon: f64, heading: f64, speed: f64, altitude: f64) -> Sample {
    Sample {
        position: GeoPoint::new(lat, lon),
        true_heading_deg: heading,
        ground_speed_mps: speed,
        altitude_m: altitude,
    }
}

#[test]
fn high_fast_sample_is_in_flight_regardless_of_ground_features() {
    let classifier = fixture();
    // Directly over the stand, but high and fast.
    let info = classifier.classify(&sample(47.00003, 15.4300, 90.0, 60.0, 600.0));
    assert_eq!(info.area, AircraftArea::InFlight);
    assert!(info.location.is_none());
}

#[test]
fn slow_climb_out_is_not_in_flight() {
    let classifier = fixture();
    // High but slow: fails the speed half of the in-flight check.
    let info = classifier.classify(&sample(47.1000, 15.5000, 90.0, 40.0, 600.0));
    assert_eq!(info.area, AircraftArea::NotDetected);
}

#[test]
fn stationary_at_stand_beats_adjacent_taxiway() {
    let classifier = fixture();
    // The stand sits within the taxiway capture radius; being stationary
    // at it must classify as parking, not taxiway.
    let info = classifier.classify(&sample(47.00003, 15.4300, 90.0, 0.1, 340.0));
    assert_eq!(info.area, AircraftArea::AtParking);
    assert_eq!(info.location.as_deref(), Some("Stand 5"));
}

#[test]
fn moving_at_stand_is_not_parking() {
    let classifier = fixture();
    let info = classifier.classify(&sample(47.00003, 15.4300, 90.0, 8.0, 340.0));
    // Moving disables the parking check; the stand is ~3m off the taxiway
    // centerline so the taxiway check captures it instead.
    assert_eq!(info.area, AircraftArea::OnTaxiway);
    assert_eq!(info.taxiway.as_deref(), Some("D"));
}

#[test]
fn taxiing_near_middle_segment_matches_taxiway() {
    let classifier = fixture();
    // ~3m north of segment 2's centerline, far from segments 1 and 3.
    let lat = 47.0000 + 3.0 / 111_183.0;
    let info = classifier.classify(&sample(lat, 15.4330, 90.0, 7.0, 340.0));
    assert_eq!(info.area, AircraftArea::OnTaxiway);
    assert_eq!(info.taxiway.as_deref(), Some("D"));
    let distance = info.distance_to_center_m.unwrap();
    assert!((2.5..=3.5).contains(&distance), "distance was {distance}");
}

#[test]
fn moving_near_holding_point_reports_associated_runway() {
    let classifier = fixture();
    let info = classifier.classify(&sample(46.9951, 15.4301, 270.0, 4.0, 340.0));
    assert_eq!(info.area, AircraftArea::AtHoldingPoint);
    assert_eq!(info.location.as_deref(), Some("D1"));
    assert_eq!(info.runway.as_deref(), Some("27"));
}

#[test]
fn rolling_on_runway_with_aligned_heading() {
    let classifier = fixture();
    let info = classifier.classify(&sample(46.9900, 15.4350, 92.0, 30.0, 340.0));
    assert_eq!(info.area, AircraftArea::OnRunway);
    assert_eq!(info.runway.as_deref(), Some("27"));
    assert!(info.distance_to_center_m.unwrap() < 22.5);
}

#[test]
fn reciprocal_heading_is_accepted_on_the_same_strip() {
    let classifier = fixture();
    let info = classifier.classify(&sample(46.9900, 15.4350, 272.0, 30.0, 340.0));
    assert_eq!(info.area, AircraftArea::OnRunway);
}

#[test]
fn crossing_heading_is_not_on_runway() {
    let classifier = fixture();
    // On the strip but heading perpendicular to it.
    let info = classifier.classify(&sample(46.9900, 15.4350, 0.0, 10.0, 340.0));
    assert_eq!(info.area, AircraftArea::NotDetected);
}

#[test]
fn position_beyond_threshold_is_not_on_runway() {
    let classifier = fixture();
    // On the extended centerline past threshold2: projection parameter > 1,
    // even though perpendicular distance to the infinite line is ~zero.
    let info = classifier.classify(&sample(46.9900, 15.4510, 90.0, 30.0, 340.0));
    assert_eq!(info.area, AircraftArea::NotDetected);
}

#[test]
fn stationary_in_the_grass_is_not_detected() {
    let classifier = fixture();
    let info = classifier.classify(&sample(47.0500, 15.5000, 0.0, 0.0, 340.0));
    assert_eq!(info.area, AircraftArea::NotDetected);
    assert_eq!(info.heading_deg, 0.0);
    assert_eq!(info.speed_mps, 0.0);
}
