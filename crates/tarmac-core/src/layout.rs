//! Airport spatial database: runways, taxiways, stands, holding points, and
//! radio frequencies, loaded once from a JSON layout file.
//!
//! All thresholds and distances are in meters; degree-based values in the
//! layout file are converted at the load boundary.

use crate::error::LayoutError;
use crate::geo::{
    self, distance_to_segment, haversine_distance, initial_bearing, offset_by_bearing,
    planar_offset_m, GeoPoint,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

/// Default capture radius for parking stands and taxiways.
pub const DEFAULT_CAPTURE_M: f64 = 22.0;
/// Looser default capture radius used for runways and holding points.
pub const DEFAULT_RUNWAY_CAPTURE_M: f64 = 222.0;
/// Segment endpoints within this distance form one taxiway junction.
pub const JUNCTION_SNAP_M: f64 = 0.5;

/// One physical runway strip. Reciprocal ends ("16C"/"34C") are a single
/// record with a single heading; direction of use is not distinguished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runway {
    pub name: String,
    pub threshold1: GeoPoint,
    pub threshold2: GeoPoint,
    pub width_m: f64,
    pub length_m: f64,
    heading_deg: Option<f64>,
}

impl Runway {
    /// Magnetic-free true heading in degrees, derived from the thresholds
    /// unless the layout supplied one explicitly.
    pub fn heading(&self) -> f64 {
        self.heading_deg
            .unwrap_or_else(|| initial_bearing(self.threshold1, self.threshold2))
    }

    /// Projection of `position` onto the centerline: `(t, perpendicular_m)`
    /// where `t` is the unclamped projection parameter (0 at threshold1,
    /// 1 at threshold2). None for a zero-length runway.
    fn centerline_projection(&self, position: GeoPoint) -> Option<(f64, f64)> {
        let (px, py) = planar_offset_m(self.threshold1, position);
        let (rx, ry) = planar_offset_m(self.threshold1, self.threshold2);

        let len_sq = rx * rx + ry * ry;
        if len_sq <= f64::EPSILON {
            return None;
        }

        let t = (px * rx + py * ry) / len_sq;
        let dx = px - t * rx;
        let dy = py - t * ry;
        Some((t, (dx * dx + dy * dy).sqrt()))
    }

    /// Perpendicular distance in meters from `position` to the runway
    /// centerline. Zero-length runway has no valid projection and returns
    /// `f64::INFINITY`.
    pub fn distance_to_center(&self, position: GeoPoint) -> f64 {
        match self.centerline_projection(position) {
            Some((_, perp)) => perp,
            None => f64::INFINITY,
        }
    }
}

/// A straight piece of taxiway centerline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxiwaySegment {
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub width_m: f64,
}

/// A named taxiway: an ordered sequence of segments. Segments typically
/// chain start/end points but are not required to be continuous.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxiway {
    pub name: String,
    pub segments: Vec<TaxiwaySegment>,
}

impl Taxiway {
    /// Minimum distance in meters from `position` to any segment.
    /// Zero-length segments are skipped as having no valid projection.
    pub fn distance_to(&self, position: GeoPoint) -> f64 {
        self.segments
            .iter()
            .map(|seg| distance_to_segment(position, seg.start, seg.end))
            .fold(f64::INFINITY, f64::min)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingPosition {
    pub name: String,
    pub position: GeoPoint,
    pub stand_type: String,
    pub elevation_m: f64,
    pub heading_deg: f64,
    pub size_m: f64,
}

/// A taxiway location short of a runway where aircraft stop pending
/// clearance. `runway` is a name reference, not ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingPoint {
    pub name: String,
    pub position: GeoPoint,
    pub runway: String,
}

/// Radio roles an aircraft talks to over the course of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadioRole {
    Ground,
    Tower,
    Departure,
    Approach,
    Center,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadioFrequency {
    pub name: String,
    pub frequency: String,
    pub description: String,
}

/// Immutable spatial model of one airport, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AirportLayout {
    pub name: String,
    pub icao: String,
    pub runways: Vec<Runway>,
    pub taxiways: Vec<Taxiway>,
    pub parking_positions: Vec<ParkingPosition>,
    pub holding_points: Vec<HoldingPoint>,
    frequencies: HashMap<RadioRole, RadioFrequency>,
}

/// Nearest-taxiway query result.
#[derive(Debug, Clone, Copy)]
pub struct TaxiwayFix<'a> {
    pub taxiway: &'a Taxiway,
    pub distance_m: f64,
}

// ---------------------------------------------------------------------------
// Layout file records (raw serde model, converted + validated into the
// domain types above).

#[derive(Debug, Deserialize)]
struct LayoutFile {
    name: String,
    icao: String,
    #[serde(default)]
    runways: Vec<RunwayRecord>,
    #[serde(default)]
    taxiways: Vec<TaxiwayRecord>,
    #[serde(default)]
    parking_positions: Vec<ParkingRecord>,
    #[serde(default)]
    holding_points: Vec<HoldingRecord>,
    radio_frequencies: HashMap<RadioRole, RadioFrequency>,
}

#[derive(Debug, Deserialize)]
struct RunwayRecord {
    name: String,
    #[serde(default)]
    threshold1_coords: Option<GeoPoint>,
    #[serde(default)]
    threshold2_coords: Option<GeoPoint>,
    /// Single-threshold form: the other end is derived from heading + length.
    #[serde(default)]
    threshold_coords: Option<GeoPoint>,
    #[serde(default)]
    heading: Option<f64>,
    width: f64,
    length: f64,
}

#[derive(Debug, Deserialize)]
struct TaxiwayRecord {
    name: String,
    #[serde(default)]
    segments: Vec<SegmentRecord>,
    /// Alternative to `segments`: an ordered polyline with a shared width,
    /// exploded into consecutive segments.
    #[serde(default)]
    polyline: Vec<GeoPoint>,
    #[serde(default)]
    width: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SegmentRecord {
    start: GeoPoint,
    end: GeoPoint,
    width: f64,
}

#[derive(Debug, Deserialize)]
struct ParkingRecord {
    name: String,
    coords: GeoPoint,
    #[serde(rename = "type")]
    stand_type: String,
    elevation: f64,
    heading: f64,
    size: f64,
}

#[derive(Debug, Deserialize)]
struct HoldingRecord {
    name: String,
    coords: GeoPoint,
    #[serde(alias = "runway")]
    associated_with: String,
}

impl AirportLayout {
    /// Load and validate an airport layout file. Any missing required field
    /// or malformed coordinate fails the whole load.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, LayoutError> {
        let file: LayoutFile = serde_json::from_str(text)?;
        Self::from_file(file)
    }

    fn from_file(file: LayoutFile) -> Result<Self, LayoutError> {
        if file.name.trim().is_empty() {
            return Err(LayoutError::Invalid("airport name is empty".into()));
        }
        if file.icao.trim().is_empty() {
            return Err(LayoutError::Invalid("ICAO code is empty".into()));
        }
        if file.runways.is_empty() {
            return Err(LayoutError::Invalid("airport has no runways".into()));
        }
        for role in [RadioRole::Ground, RadioRole::Tower, RadioRole::Departure] {
            if !file.radio_frequencies.contains_key(&role) {
                return Err(LayoutError::Invalid(format!(
                    "missing radio frequency for {role:?}"
                )));
            }
        }

        let runways = file
            .runways
            .into_iter()
            .map(Self::convert_runway)
            .collect::<Result<Vec<_>, _>>()?;
        let taxiways = file
            .taxiways
            .into_iter()
            .map(Self::convert_taxiway)
            .collect::<Result<Vec<_>, _>>()?;

        let parking_positions = file
            .parking_positions
            .into_iter()
            .map(|p| ParkingPosition {
                name: p.name,
                position: p.coords,
                stand_type: p.stand_type,
                elevation_m: p.elevation,
                heading_deg: p.heading,
                size_m: p.size,
            })
            .collect();

        let holding_points = file
            .holding_points
            .into_iter()
            .map(|h| HoldingPoint {
                name: h.name,
                position: h.coords,
                runway: h.associated_with,
            })
            .collect();

        Ok(Self {
            name: file.name,
            icao: file.icao,
            runways,
            taxiways,
            parking_positions,
            holding_points,
            frequencies: file.radio_frequencies,
        })
    }

    fn convert_runway(rec: RunwayRecord) -> Result<Runway, LayoutError> {
        let threshold1 = rec.threshold1_coords.or(rec.threshold_coords).ok_or_else(|| {
            LayoutError::Invalid(format!("runway {}: missing threshold coordinates", rec.name))
        })?;

        let threshold2 = match rec.threshold2_coords {
            Some(t2) => t2,
            None => {
                let heading = rec.heading.ok_or_else(|| {
                    LayoutError::Invalid(format!(
                        "runway {}: single threshold requires an explicit heading",
                        rec.name
                    ))
                })?;
                offset_by_bearing(threshold1, rec.length, heading)
            }
        };

        if haversine_distance(threshold1, threshold2) <= f64::EPSILON {
            return Err(LayoutError::Invalid(format!(
                "runway {}: thresholds are coincident",
                rec.name
            )));
        }

        Ok(Runway {
            name: rec.name,
            threshold1,
            threshold2,
            width_m: rec.width,
            length_m: rec.length,
            heading_deg: rec.heading,
        })
    }

    fn convert_taxiway(rec: TaxiwayRecord) -> Result<Taxiway, LayoutError> {
        let segments = if !rec.segments.is_empty() {
            rec.segments
                .into_iter()
                .map(|s| TaxiwaySegment { start: s.start, end: s.end, width_m: s.width })
                .collect()
        } else {
            if rec.polyline.len() < 2 {
                return Err(LayoutError::Invalid(format!(
                    "taxiway {}: needs segments or a polyline of at least two points",
                    rec.name
                )));
            }
            let width = rec.width.ok_or_else(|| {
                LayoutError::Invalid(format!("taxiway {}: polyline form requires a width", rec.name))
            })?;
            rec.polyline
                .windows(2)
                .map(|pair| TaxiwaySegment { start: pair[0], end: pair[1], width_m: width })
                .collect()
        };

        Ok(Taxiway { name: rec.name, segments })
    }

    /// Radio frequency for a role, if the layout defines one.
    pub fn frequency(&self, role: RadioRole) -> Option<&RadioFrequency> {
        self.frequencies.get(&role)
    }

    pub fn frequencies(&self) -> &HashMap<RadioRole, RadioFrequency> {
        &self.frequencies
    }

    /// Nearest parking stand within `threshold_m` of `position`, or None.
    pub fn nearest_parking(&self, position: GeoPoint, threshold_m: f64) -> Option<&ParkingPosition> {
        let nearest = self
            .parking_positions
            .iter()
            .min_by(|a, b| {
                haversine_distance(a.position, position)
                    .partial_cmp(&haversine_distance(b.position, position))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;

        (haversine_distance(nearest.position, position) <= threshold_m).then_some(nearest)
    }

    /// Nearest taxiway by centerline distance over all segments of all
    /// taxiways. The capture radius is the larger of `threshold_m` and half
    /// the winning taxiway's width, so wider taxiways capture further out.
    pub fn nearest_taxiway(&self, position: GeoPoint, threshold_m: f64) -> Option<TaxiwayFix<'_>> {
        let mut nearest: Option<TaxiwayFix<'_>> = None;

        for taxiway in &self.taxiways {
            let distance_m = taxiway.distance_to(position);
            if nearest.map_or(true, |fix| distance_m < fix.distance_m) {
                nearest = Some(TaxiwayFix { taxiway, distance_m });
            }
        }

        let fix = nearest?;
        let half_width = fix
            .taxiway
            .segments
            .first()
            .map_or(0.0, |seg| seg.width_m / 2.0);
        (fix.distance_m <= threshold_m.max(half_width)).then_some(fix)
    }

    /// Runway whose heading is closest to the wind direction under modular
    /// arithmetic. Ties break by list order.
    pub fn active_runway(&self, wind_direction_deg: f64) -> Option<&Runway> {
        self.runways.iter().min_by(|a, b| {
            let da = (a.heading() - wind_direction_deg).rem_euclid(360.0);
            let db = (b.heading() - wind_direction_deg).rem_euclid(360.0);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Whether `position` lies on `runway`: between the thresholds
    /// (projection parameter in `[0, 1]`) and within the larger of
    /// `threshold_m` and half the runway width of the centerline.
    pub fn is_on_runway(&self, position: GeoPoint, runway: &Runway, threshold_m: f64) -> bool {
        let Some((t, perp_m)) = runway.centerline_projection(position) else {
            return false;
        };
        if !(0.0..=1.0).contains(&t) {
            return false;
        }
        perp_m <= threshold_m.max(runway.width_m / 2.0)
    }

    /// First holding point whose latitude AND longitude each differ from
    /// `position` by less than `threshold_m` (converted to degrees at the
    /// holding point's latitude). This is a bounding-box test, intentionally
    /// looser than the circular capture radius used elsewhere.
    pub fn holding_point_at(&self, position: GeoPoint, threshold_m: f64) -> Option<&HoldingPoint> {
        self.holding_points.iter().find(|hp| {
            let lat_limit = geo::meters_to_lat_deg(threshold_m, hp.position.lat);
            let lon_limit = geo::meters_to_lon_deg(threshold_m, hp.position.lat);
            (hp.position.lat - position.lat).abs() <= lat_limit
                && (hp.position.lon - position.lon).abs() <= lon_limit
        })
    }

    fn nearest_taxiway_index(&self, position: GeoPoint) -> Option<usize> {
        let mut nearest: Option<(usize, f64)> = None;
        for (idx, taxiway) in self.taxiways.iter().enumerate() {
            let distance_m = taxiway.distance_to(position);
            if nearest.map_or(true, |(_, best)| distance_m < best) {
                nearest = Some((idx, distance_m));
            }
        }
        nearest.map(|(idx, _)| idx)
    }

    /// Two taxiways are adjacent iff any pair of segment endpoints lie
    /// within the junction snap tolerance.
    fn taxiways_connected(&self, a: &Taxiway, b: &Taxiway) -> bool {
        for seg_a in &a.segments {
            for seg_b in &b.segments {
                for pa in [seg_a.start, seg_a.end] {
                    for pb in [seg_b.start, seg_b.end] {
                        if haversine_distance(pa, pb) <= JUNCTION_SNAP_M {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// Taxi route between two positions as an ordered list of taxiway names:
    /// the taxiways nearest each endpoint, joined by a breadth-first search
    /// over junction adjacency (shortest by hop count). Empty if either
    /// endpoint has no nearby taxiway or no connected path exists.
    pub fn taxi_route(&self, start: GeoPoint, end: GeoPoint) -> Vec<String> {
        let Some(start_idx) = self.nearest_taxiway_index(start) else {
            return Vec::new();
        };
        let Some(end_idx) = self.nearest_taxiway_index(end) else {
            return Vec::new();
        };

        if start_idx == end_idx {
            return vec![self.taxiways[start_idx].name.clone()];
        }

        let mut visited: HashSet<usize> = HashSet::new();
        let mut queue: VecDeque<(usize, Vec<usize>)> = VecDeque::new();
        queue.push_back((start_idx, vec![start_idx]));

        while let Some((current, path)) = queue.pop_front() {
            if current == end_idx {
                return path.iter().map(|&i| self.taxiways[i].name.clone()).collect();
            }
            if !visited.insert(current) {
                continue;
            }
            for (idx, taxiway) in self.taxiways.iter().enumerate() {
                if idx != current
                    && !visited.contains(&idx)
                    && self.taxiways_connected(&self.taxiways[current], taxiway)
                {
                    let mut next_path = path.clone();
                    next_path.push(idx);
                    queue.push_back((idx, next_path));
                }
            }
        }

        Vec::new()
    }
}
