//! Table-driven ATC phraseology engine.
//!
//! A scripted departure flow: transitions are keyed by (current radio state,
//! required aircraft status), pilot responses are validated by exact
//! (trimmed, case-insensitive) match against the expected readback, and a
//! matched transition advances the radio state and aircraft status.
//!
//! Message text embeds the callsign, so the whole table is rebuilt whenever
//! the callsign changes.

use crate::layout::{AirportLayout, RadioFrequency, RadioRole};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Radio state: which controller the aircraft is currently talking to.
/// Approach/Center/Waiting are reserved for inbound flows not populated in
/// the departure script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AtcState {
    Ground,
    Tower,
    Departure,
    Approach,
    Center,
    Waiting,
}

impl AtcState {
    /// The radio role whose frequency this state uses, if any.
    pub fn radio_role(self) -> Option<RadioRole> {
        match self {
            AtcState::Ground => Some(RadioRole::Ground),
            AtcState::Tower => Some(RadioRole::Tower),
            AtcState::Departure => Some(RadioRole::Departure),
            AtcState::Approach => Some(RadioRole::Approach),
            AtcState::Center => Some(RadioRole::Center),
            AtcState::Waiting => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AircraftStatus {
    AtGate,
    Pushback,
    Taxiing,
    HoldingShort,
    LinedUp,
    Takeoff,
    Climbing,
    Cruising,
    Descending,
    Approaching,
    Landing,
    Landed,
}

/// What kind of pilot response a transition expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseType {
    /// Verbatim repetition of the instruction
    Readback,
    /// Wilco/roger acknowledgment
    Acknowledge,
    /// Report when ready
    ReadyReport,
    NoResponse,
}

/// Derived response expectation for the currently applicable transition.
#[derive(Debug, Clone)]
pub struct ExpectedResponse {
    pub response_type: ResponseType,
    pub requires_readback: bool,
    pub requires_acknowledgment: bool,
    pub requires_ready_report: bool,
    /// The action the pilot is expected to report or read back.
    pub action: String,
}

/// One edge of the phraseology graph. Built per callsign; immutable until
/// the callsign changes.
#[derive(Debug, Clone)]
pub struct AtcTransition {
    pub from_state: AtcState,
    pub to_state: AtcState,
    pub required_status: Vec<AircraftStatus>,
    pub trigger_message: String,
    pub expected_response: String,
    pub next_actions: Vec<String>,
    pub response_type: ResponseType,
    pub action: &'static str,
    /// Aircraft status after this transition matches. None leaves the
    /// status unchanged.
    pub resulting_status: Option<AircraftStatus>,
}

/// An outbound ATC message tagged with its originating state and frequency.
#[derive(Debug, Clone, Serialize)]
pub struct RadioMessage {
    pub message: String,
    pub state: AtcState,
    pub frequency: String,
}

/// Result of processing one pilot response.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Whether any transition matched. An unmatched response is not an
    /// error; state is left unchanged so the pilot can retry.
    pub matched: bool,
    /// Message to deliver to the radio (next scripted action, or a standby
    /// placeholder from `handle_pilot_message`).
    pub outbound: Option<RadioMessage>,
}

const DEFAULT_CALLSIGN: &str = "aabbcc";

/// Layout-derived script parameters baked into the transition messages.
#[derive(Debug, Clone)]
struct ScriptContext {
    departure_runway: String,
    taxi_route: String,
}

impl ScriptContext {
    fn from_layout(layout: &AirportLayout) -> Self {
        let departure_runway = layout
            .runways
            .first()
            .map(|r| r.name.clone())
            .unwrap_or_default();
        let taxi_route = layout
            .taxiways
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self { departure_runway, taxi_route }
    }
}

/// The phraseology state machine. Runtime state (current radio state,
/// aircraft status, callsign) is the one concurrently-touched mutable piece
/// of the core; callers serialize access with a single lock around each
/// operation.
#[derive(Debug)]
pub struct AtcStateManager {
    frequencies: HashMap<RadioRole, RadioFrequency>,
    script: ScriptContext,
    transitions: Vec<AtcTransition>,
    current_state: AtcState,
    aircraft_status: AircraftStatus,
    callsign: String,
}

impl AtcStateManager {
    pub fn new(layout: &AirportLayout) -> Self {
        let frequencies = layout.frequencies().clone();
        let script = ScriptContext::from_layout(layout);
        let callsign = DEFAULT_CALLSIGN.to_string();
        let transitions = build_transitions(&callsign, &script, &frequencies);
        Self {
            frequencies,
            script,
            transitions,
            current_state: AtcState::Ground,
            aircraft_status: AircraftStatus::AtGate,
            callsign,
        }
    }

    pub fn current_state(&self) -> AtcState {
        self.current_state
    }

    pub fn aircraft_status(&self) -> AircraftStatus {
        self.aircraft_status
    }

    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    /// Frequency of the current radio state, if it has one.
    pub fn current_frequency(&self) -> Option<&RadioFrequency> {
        self.current_state
            .radio_role()
            .and_then(|role| self.frequencies.get(&role))
    }

    pub fn update_aircraft_status(&mut self, status: AircraftStatus) {
        self.aircraft_status = status;
    }

    fn applicable_transitions(&self) -> impl Iterator<Item = &AtcTransition> {
        self.transitions.iter().filter(|t| {
            t.from_state == self.current_state && t.required_status.contains(&self.aircraft_status)
        })
    }

    /// The next scripted message for the current (state, status) pair, or
    /// None when no transition applies. First transition in definition
    /// order wins.
    pub fn next_message(&self) -> Option<&str> {
        self.applicable_transitions()
            .next()
            .map(|t| t.trigger_message.as_str())
    }

    /// Response expectation for the currently applicable transition.
    pub fn expected_response(&self) -> Option<ExpectedResponse> {
        self.applicable_transitions().next().map(|t| ExpectedResponse {
            response_type: t.response_type,
            requires_readback: t.response_type == ResponseType::Readback,
            requires_acknowledgment: t.response_type == ResponseType::Acknowledge,
            requires_ready_report: t.response_type == ResponseType::ReadyReport,
            action: t.action.to_string(),
        })
    }

    /// Validate a pilot response against the applicable transitions.
    ///
    /// The trimmed input is compared case-insensitively against each
    /// applicable transition's expected response. A match whose target is
    /// Tower or Departure additionally requires the supplied frequency to
    /// equal that role's configured frequency; a mismatch fails that
    /// transition silently and scanning continues. On a full match the
    /// state advances, the transition's declared status applies, and the
    /// first next-action message is returned for delivery.
    pub fn process_response(&mut self, response: &str, frequency: Option<&str>) -> ProcessResult {
        let input = response.trim();

        let matched = self
            .applicable_transitions()
            .enumerate()
            .find(|(_, t)| {
                if !input.eq_ignore_ascii_case(&t.expected_response) {
                    return false;
                }
                if matches!(t.to_state, AtcState::Tower | AtcState::Departure) {
                    let expected = self
                        .frequencies
                        .get(&t.to_state.radio_role().unwrap_or(RadioRole::Ground))
                        .map(|f| f.frequency.as_str());
                    if let (Some(supplied), Some(expected)) = (frequency, expected) {
                        if supplied != expected {
                            return false;
                        }
                    }
                }
                true
            })
            .map(|(idx, _)| idx);

        let Some(idx) = matched else {
            return ProcessResult { matched: false, outbound: None };
        };

        // Re-resolve the transition by index to drop the iterator borrow.
        let transition = self
            .transitions
            .iter()
            .filter(|t| {
                t.from_state == self.current_state
                    && t.required_status.contains(&self.aircraft_status)
            })
            .nth(idx)
            .cloned();

        let Some(transition) = transition else {
            return ProcessResult { matched: false, outbound: None };
        };

        self.current_state = transition.to_state;
        if let Some(status) = transition.resulting_status {
            self.aircraft_status = status;
        }

        let outbound = transition.next_actions.first().map(|message| RadioMessage {
            message: message.clone(),
            state: self.current_state,
            frequency: self
                .current_frequency()
                .map(|f| f.frequency.clone())
                .unwrap_or_default(),
        });

        ProcessResult { matched: true, outbound }
    }

    /// Handle an inbound pilot message event. A supplied non-empty callsign
    /// that differs from the current one rebuilds the transition table
    /// first. An unmatched response leaves state unchanged and yields a
    /// standby placeholder instead of the next scripted action.
    pub fn handle_pilot_message(
        &mut self,
        message: &str,
        frequency: Option<&str>,
        callsign: Option<&str>,
    ) -> ProcessResult {
        if let Some(new_callsign) = callsign {
            let new_callsign = new_callsign.trim();
            if !new_callsign.is_empty() && new_callsign != self.callsign {
                self.callsign = new_callsign.to_string();
                self.transitions =
                    build_transitions(&self.callsign, &self.script, &self.frequencies);
            }
        }

        let result = self.process_response(message, frequency);
        if result.matched {
            return result;
        }

        let standby = RadioMessage {
            message: format!("{}, standby", self.callsign),
            state: self.current_state,
            frequency: self
                .current_frequency()
                .map(|f| f.frequency.clone())
                .unwrap_or_default(),
        };
        ProcessResult { matched: false, outbound: Some(standby) }
    }
}

/// Build the scripted departure flow for one callsign. Definition order is
/// selection order.
fn build_transitions(
    callsign: &str,
    script: &ScriptContext,
    frequencies: &HashMap<RadioRole, RadioFrequency>,
) -> Vec<AtcTransition> {
    let tower = frequencies.get(&RadioRole::Tower);
    let tower_name = tower.map(|f| f.name.as_str()).unwrap_or("Tower");
    let tower_freq = tower.map(|f| f.frequency.as_str()).unwrap_or("");
    let departure_freq = frequencies
        .get(&RadioRole::Departure)
        .map(|f| f.frequency.as_str())
        .unwrap_or("");

    let runway = &script.departure_runway;
    let via = &script.taxi_route;

    vec![
        // Ground control phase
        AtcTransition {
            from_state: AtcState::Ground,
            to_state: AtcState::Ground,
            required_status: vec![AircraftStatus::AtGate],
            trigger_message: format!("Ground: {callsign}, request pushback"),
            expected_response: format!("Requesting pushback, {callsign}"),
            next_actions: vec![format!("Ground: {callsign}, pushback approved, face east")],
            response_type: ResponseType::Readback,
            action: "pushback",
            resulting_status: Some(AircraftStatus::Pushback),
        },
        AtcTransition {
            from_state: AtcState::Ground,
            to_state: AtcState::Ground,
            required_status: vec![AircraftStatus::Pushback],
            trigger_message: format!("Ground: {callsign}, pushback approved, face east"),
            expected_response: format!("Pushback approved, face east, {callsign}"),
            next_actions: vec![format!("Ground: {callsign}, report when ready to taxi")],
            response_type: ResponseType::Readback,
            action: "pushback",
            resulting_status: Some(AircraftStatus::Pushback),
        },
        AtcTransition {
            from_state: AtcState::Ground,
            to_state: AtcState::Ground,
            required_status: vec![AircraftStatus::Pushback],
            trigger_message: format!("Ground: {callsign}, report when ready to taxi"),
            expected_response: format!("Ready to taxi, {callsign}"),
            next_actions: vec![format!("Ground: {callsign}, taxi to Runway {runway} via {via}")],
            response_type: ResponseType::ReadyReport,
            action: "taxi",
            resulting_status: Some(AircraftStatus::Taxiing),
        },
        AtcTransition {
            from_state: AtcState::Ground,
            to_state: AtcState::Ground,
            required_status: vec![AircraftStatus::Pushback, AircraftStatus::Taxiing],
            trigger_message: format!("Ground: {callsign}, taxi to Runway {runway} via {via}"),
            expected_response: format!("Taxi to Runway {runway} via {via}, {callsign}"),
            next_actions: vec![format!("Ground: {callsign}, hold short Runway {runway}")],
            response_type: ResponseType::Readback,
            action: "taxi",
            resulting_status: Some(AircraftStatus::Taxiing),
        },
        AtcTransition {
            from_state: AtcState::Ground,
            to_state: AtcState::Ground,
            required_status: vec![AircraftStatus::Taxiing],
            trigger_message: format!("Ground: {callsign}, hold short Runway {runway}"),
            expected_response: format!("Hold short Runway {runway}, {callsign}"),
            next_actions: vec![format!("Ground: {callsign}, contact {tower_name} {tower_freq}")],
            response_type: ResponseType::Readback,
            action: "hold short",
            resulting_status: Some(AircraftStatus::HoldingShort),
        },
        AtcTransition {
            from_state: AtcState::Ground,
            to_state: AtcState::Ground,
            required_status: vec![AircraftStatus::Taxiing],
            trigger_message: format!("Ground: {callsign}, cross Runway {runway}"),
            expected_response: format!("Cross Runway {runway}, {callsign}"),
            next_actions: vec![format!("Ground: {callsign}, continue taxi via {via}")],
            response_type: ResponseType::Readback,
            action: "cross runway",
            resulting_status: None,
        },
        AtcTransition {
            from_state: AtcState::Ground,
            to_state: AtcState::Ground,
            required_status: vec![AircraftStatus::Taxiing],
            trigger_message: format!("Ground: {callsign}, continue taxi via {via}"),
            expected_response: format!("Continue taxi via {via}, {callsign}"),
            next_actions: vec![format!("Ground: {callsign}, hold short Runway {runway}")],
            response_type: ResponseType::Readback,
            action: "taxi",
            resulting_status: Some(AircraftStatus::Taxiing),
        },
        // Ground to tower handoff
        AtcTransition {
            from_state: AtcState::Ground,
            to_state: AtcState::Tower,
            required_status: vec![AircraftStatus::HoldingShort],
            trigger_message: format!("Ground: {callsign}, contact {tower_name} {tower_freq}"),
            expected_response: format!("Contacting {tower_name} {tower_freq}, {callsign}"),
            next_actions: vec![format!("{tower_name}: {callsign}, hold short Runway {runway}")],
            response_type: ResponseType::Readback,
            action: "contact tower",
            resulting_status: None,
        },
        // Tower phase
        AtcTransition {
            from_state: AtcState::Tower,
            to_state: AtcState::Tower,
            required_status: vec![AircraftStatus::HoldingShort],
            trigger_message: format!("{tower_name}: {callsign}, hold short Runway {runway}"),
            expected_response: format!("Hold short Runway {runway}, {callsign}"),
            next_actions: vec![format!("{tower_name}: {callsign}, line up and wait Runway {runway}")],
            response_type: ResponseType::Readback,
            action: "hold short",
            resulting_status: Some(AircraftStatus::HoldingShort),
        },
        AtcTransition {
            from_state: AtcState::Tower,
            to_state: AtcState::Tower,
            required_status: vec![AircraftStatus::HoldingShort],
            trigger_message: format!("{tower_name}: {callsign}, line up and wait Runway {runway}"),
            expected_response: format!("Line up and wait Runway {runway}, {callsign}"),
            next_actions: vec![format!("{tower_name}: {callsign}, cleared for takeoff Runway {runway}")],
            response_type: ResponseType::Readback,
            action: "line up",
            resulting_status: Some(AircraftStatus::LinedUp),
        },
        AtcTransition {
            from_state: AtcState::Tower,
            to_state: AtcState::Tower,
            required_status: vec![AircraftStatus::LinedUp],
            trigger_message: format!("{tower_name}: {callsign}, cleared for takeoff Runway {runway}"),
            expected_response: format!("Cleared for takeoff Runway {runway}, {callsign}"),
            next_actions: vec![format!("{tower_name}: {callsign}, contact Departure {departure_freq}")],
            response_type: ResponseType::Readback,
            action: "takeoff",
            resulting_status: Some(AircraftStatus::Takeoff),
        },
        // Tower to departure handoff
        AtcTransition {
            from_state: AtcState::Tower,
            to_state: AtcState::Departure,
            required_status: vec![AircraftStatus::Takeoff, AircraftStatus::Climbing],
            trigger_message: format!("{tower_name}: {callsign}, contact Departure {departure_freq}"),
            expected_response: format!("Contacting Departure {departure_freq}, {callsign}"),
            next_actions: vec![format!("Departure: {callsign}, climb and maintain 5,000")],
            response_type: ResponseType::Readback,
            action: "climb",
            resulting_status: Some(AircraftStatus::Climbing),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_layout() -> AirportLayout {
        AirportLayout::from_json_str(
            r#"{
                "name": "Graz Airport",
                "icao": "LOWG",
                "runways": [
                    {
                        "name": "16C",
                        "threshold1_coords": [47.0080, 15.4380],
                        "threshold2_coords": [46.9830, 15.4420],
                        "width": 45,
                        "length": 3000
                    }
                ],
                "taxiways": [
                    {"name": "Alpha", "segments": [{"start": [47.0, 15.43], "end": [47.0, 15.434], "width": 30}]},
                    {"name": "Bravo", "segments": [{"start": [47.0, 15.434], "end": [47.0, 15.438], "width": 30}]}
                ],
                "radio_frequencies": {
                    "ground": {"name": "Graz Ground", "frequency": "121.600", "description": "Ground control"},
                    "tower": {"name": "Graz Tower", "frequency": "118.100", "description": "Tower"},
                    "departure": {"name": "Graz Departure", "frequency": "126.100", "description": "Departure"}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn initial_state_offers_pushback_request() {
        let layout = fixture_layout();
        let manager = AtcStateManager::new(&layout);
        assert_eq!(manager.current_state(), AtcState::Ground);
        assert_eq!(manager.aircraft_status(), AircraftStatus::AtGate);
        assert_eq!(
            manager.next_message(),
            Some("Ground: aabbcc, request pushback")
        );

        let expected = manager.expected_response().unwrap();
        assert_eq!(expected.response_type, ResponseType::Readback);
        assert!(expected.requires_readback);
        assert!(!expected.requires_ready_report);
        assert_eq!(expected.action, "pushback");
    }

    #[test]
    fn pushback_readback_advances_status() {
        let layout = fixture_layout();
        let mut manager = AtcStateManager::new(&layout);

        let result = manager.process_response("Requesting pushback, aabbcc", None);
        assert!(result.matched);
        assert_eq!(manager.aircraft_status(), AircraftStatus::Pushback);
        assert_eq!(manager.current_state(), AtcState::Ground);
        assert_eq!(
            result.outbound.unwrap().message,
            "Ground: aabbcc, pushback approved, face east"
        );
    }

    #[test]
    fn readback_match_is_trimmed_and_case_insensitive() {
        let layout = fixture_layout();
        let mut manager = AtcStateManager::new(&layout);

        let result = manager.process_response("  REQUESTING PUSHBACK, AABBCC  ", None);
        assert!(result.matched);
        assert_eq!(manager.aircraft_status(), AircraftStatus::Pushback);
    }

    #[test]
    fn unrelated_response_leaves_state_unchanged() {
        let layout = fixture_layout();
        let mut manager = AtcStateManager::new(&layout);

        let result = manager.process_response("Say again, aabbcc", None);
        assert!(!result.matched);
        assert!(result.outbound.is_none());
        assert_eq!(manager.current_state(), AtcState::Ground);
        assert_eq!(manager.aircraft_status(), AircraftStatus::AtGate);
    }

    #[test]
    fn tower_contact_requires_matching_frequency() {
        let layout = fixture_layout();
        let mut manager = AtcStateManager::new(&layout);
        manager.update_aircraft_status(AircraftStatus::HoldingShort);

        // Correct wording, wrong frequency: transition must fail silently.
        let wrong = manager.process_response(
            "Contacting Graz Tower 118.100, aabbcc",
            Some("121.600"),
        );
        assert!(!wrong.matched);
        assert_eq!(manager.current_state(), AtcState::Ground);

        let right = manager.process_response(
            "Contacting Graz Tower 118.100, aabbcc",
            Some("118.100"),
        );
        assert!(right.matched);
        assert_eq!(manager.current_state(), AtcState::Tower);
        assert_eq!(
            right.outbound.unwrap().frequency,
            "118.100"
        );
    }

    #[test]
    fn full_departure_script_reaches_departure() {
        let layout = fixture_layout();
        let mut manager = AtcStateManager::new(&layout);

        for response in [
            "Requesting pushback, aabbcc",
            "Pushback approved, face east, aabbcc",
            "Ready to taxi, aabbcc",
            "Taxi to Runway 16C via Alpha, Bravo, aabbcc",
            "Hold short Runway 16C, aabbcc",
        ] {
            assert!(manager.process_response(response, None).matched, "failed at {response}");
        }
        assert_eq!(manager.aircraft_status(), AircraftStatus::HoldingShort);

        assert!(manager
            .process_response("Contacting Graz Tower 118.100, aabbcc", Some("118.100"))
            .matched);
        assert_eq!(manager.current_state(), AtcState::Tower);

        for response in [
            "Hold short Runway 16C, aabbcc",
            "Line up and wait Runway 16C, aabbcc",
            "Cleared for takeoff Runway 16C, aabbcc",
        ] {
            assert!(manager.process_response(response, None).matched, "failed at {response}");
        }
        assert_eq!(manager.aircraft_status(), AircraftStatus::Takeoff);

        assert!(manager
            .process_response("Contacting Departure 126.100, aabbcc", Some("126.100"))
            .matched);
        assert_eq!(manager.current_state(), AtcState::Departure);
        assert_eq!(manager.aircraft_status(), AircraftStatus::Climbing);
    }

    #[test]
    fn callsign_change_rebuilds_transitions() {
        let layout = fixture_layout();
        let mut manager = AtcStateManager::new(&layout);

        let result =
            manager.handle_pilot_message("Requesting pushback, OE-LBT", None, Some("OE-LBT"));
        assert!(result.matched);
        assert_eq!(manager.callsign(), "OE-LBT");
        assert_eq!(
            manager.next_message(),
            Some("Ground: OE-LBT, pushback approved, face east")
        );
    }

    #[test]
    fn unmatched_pilot_message_yields_standby() {
        let layout = fixture_layout();
        let mut manager = AtcStateManager::new(&layout);

        let result = manager.handle_pilot_message("Good morning", None, None);
        assert!(!result.matched);
        let reply = result.outbound.unwrap();
        assert_eq!(reply.message, "aabbcc, standby");
        assert_eq!(reply.state, AtcState::Ground);
        assert_eq!(reply.frequency, "121.600");
        assert_eq!(manager.aircraft_status(), AircraftStatus::AtGate);
    }

    #[test]
    fn no_transition_for_unpopulated_states() {
        let layout = fixture_layout();
        let mut manager = AtcStateManager::new(&layout);
        manager.update_aircraft_status(AircraftStatus::Landed);
        assert!(manager.next_message().is_none());
        assert!(manager.expected_response().is_none());
    }
}
