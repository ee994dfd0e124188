//! Core logic for ground-traffic awareness and scripted ATC radio exchanges:
//! airport spatial model, per-sample position classification, and the
//! phraseology state machine.

pub mod classify;
pub mod error;
pub mod geo;
pub mod layout;
pub mod phraseology;

pub use classify::{format_position_info, AircraftArea, PositionClassifier, PositionInfo, Sample};
pub use error::LayoutError;
pub use geo::{distance_to_segment, haversine_distance, initial_bearing, GeoPoint};
pub use layout::{
    AirportLayout, HoldingPoint, ParkingPosition, RadioFrequency, RadioRole, Runway, Taxiway,
    TaxiwayFix, TaxiwaySegment,
};
pub use phraseology::{
    AircraftStatus, AtcState, AtcStateManager, AtcTransition, ExpectedResponse, ProcessResult,
    RadioMessage, ResponseType,
};
