//! Shared application state.
//!
//! The layout and classifier are read-only after construction and safe for
//! concurrent readers. The phraseology manager is the one mutable piece and
//! sits behind a single mutex held for the duration of each operation.

use std::sync::{Arc, Mutex};
use tarmac_core::phraseology::ProcessResult;
use tarmac_core::{
    AircraftStatus, AirportLayout, AtcState, AtcStateManager, PositionClassifier, PositionInfo,
    Sample,
};

pub struct AppState {
    pub layout: Arc<AirportLayout>,
    classifier: PositionClassifier,
    atc: Mutex<AtcStateManager>,
    latest_sample: Mutex<Option<Sample>>,
}

impl AppState {
    pub fn new(layout: AirportLayout) -> Self {
        let layout = Arc::new(layout);
        let classifier = PositionClassifier::new(layout.clone());
        let atc = Mutex::new(AtcStateManager::new(&layout));
        Self {
            layout,
            classifier,
            atc,
            latest_sample: Mutex::new(None),
        }
    }

    /// Store the most recent telemetry sample and classify it.
    pub fn ingest_sample(&self, sample: Sample) -> PositionInfo {
        if let Ok(mut slot) = self.latest_sample.lock() {
            *slot = Some(sample);
        }
        self.classifier.classify(&sample)
    }

    /// Latest telemetry sample, if any has arrived yet.
    pub fn latest_sample(&self) -> Option<Sample> {
        self.latest_sample.lock().ok().and_then(|slot| *slot)
    }

    /// Next scripted ATC message for the current state, if one applies.
    pub fn next_message(&self) -> Option<String> {
        self.atc
            .lock()
            .ok()
            .and_then(|atc| atc.next_message().map(str::to_string))
    }

    /// Process an inbound pilot-response event.
    pub fn handle_pilot_message(
        &self,
        message: &str,
        frequency: Option<&str>,
        callsign: Option<&str>,
    ) -> Option<ProcessResult> {
        self.atc
            .lock()
            .ok()
            .map(|mut atc| atc.handle_pilot_message(message, frequency, callsign))
    }

    pub fn update_aircraft_status(&self, status: AircraftStatus) {
        if let Ok(mut atc) = self.atc.lock() {
            atc.update_aircraft_status(status);
        }
    }

    /// Current (radio state, aircraft status) pair, for logging.
    pub fn radio_state(&self) -> Option<(AtcState, AircraftStatus)> {
        self.atc
            .lock()
            .ok()
            .map(|atc| (atc.current_state(), atc.aircraft_status()))
    }
}
