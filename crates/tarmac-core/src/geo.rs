//! Great-circle and local-planar math for airport-scale distances.

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84-approximate position in decimal degrees.
///
/// Serialized as a `[lat, lon]` pair to match the airport layout file format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(coords: [f64; 2]) -> Self {
        Self { lat: coords[0], lon: coords[1] }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.lat, p.lon]
    }
}

/// Great-circle distance between two points in meters (Haversine formula).
pub fn haversine_distance(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let phi1 = p1.lat.to_radians();
    let phi2 = p2.lat.to_radians();
    let dphi = (p2.lat - p1.lat).to_radians();
    let dlambda = (p2.lon - p1.lon).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Initial great-circle bearing from `p1` to `p2`, in degrees `[0, 360)`.
///
/// Coincident points have no defined direction; returns 0.0 for them.
pub fn initial_bearing(p1: GeoPoint, p2: GeoPoint) -> f64 {
    if p1 == p2 {
        return 0.0;
    }
    let phi1 = p1.lat.to_radians();
    let phi2 = p2.lat.to_radians();
    let dlambda = (p2.lon - p1.lon).to_radians();

    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

/// Convert a north/south offset in meters to degrees latitude.
pub fn meters_to_lat_deg(meters: f64, ref_lat_deg: f64) -> f64 {
    meters / meters_per_deg_lat(ref_lat_deg).max(1e-9)
}

/// Convert an east/west offset in meters to degrees longitude at a latitude.
pub fn meters_to_lon_deg(meters: f64, ref_lat_deg: f64) -> f64 {
    meters / meters_per_deg_lon(ref_lat_deg).max(1e-9)
}

/// Local planar (east, north) offsets in meters from `origin` to `p`.
///
/// Equirectangular approximation scaled at the origin latitude. Only valid
/// within a few kilometers of the origin; not a projected CRS.
pub fn planar_offset_m(origin: GeoPoint, p: GeoPoint) -> (f64, f64) {
    let east = (p.lon - origin.lon) * meters_per_deg_lon(origin.lat);
    let north = (p.lat - origin.lat) * meters_per_deg_lat(origin.lat);
    (east, north)
}

/// Offset a position by distance and bearing (degrees, 0 = north).
pub fn offset_by_bearing(origin: GeoPoint, distance_m: f64, bearing_deg: f64) -> GeoPoint {
    if distance_m.abs() <= f64::EPSILON {
        return origin;
    }

    let bearing_rad = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat2 =
        lat1.sin() * angular_distance.cos() + lat1.cos() * angular_distance.sin() * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * angular_distance.sin() * lat1.cos();
    let x = angular_distance.cos() - lat1.sin() * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 =
        (lon2 + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI;

    GeoPoint::new(lat2.to_degrees(), lon2.to_degrees())
}

/// Minimum distance in meters from `point` to the segment `(seg_start, seg_end)`.
///
/// Projects onto the segment in local planar coordinates and clamps the
/// projection parameter to `[0, 1]`, so this is distance to the closest point
/// ON the segment, not the infinite line. A zero-length segment has no valid
/// projection and returns `f64::INFINITY`.
pub fn distance_to_segment(point: GeoPoint, seg_start: GeoPoint, seg_end: GeoPoint) -> f64 {
    let (px, py) = planar_offset_m(seg_start, point);
    let (sx, sy) = planar_offset_m(seg_start, seg_end);

    let seg_len_sq = sx * sx + sy * sy;
    if seg_len_sq <= f64::EPSILON {
        return f64::INFINITY;
    }

    let t = ((px * sx + py * sy) / seg_len_sq).clamp(0.0, 1.0);

    let dx = px - t * sx;
    let dy = py - t * sy;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
        assert!((dist - 111_194.0).abs() < 100.0);
    }

    #[test]
    fn haversine_same_point_is_zero() {
        let p = GeoPoint::new(46.9911, 15.4396);
        assert!(haversine_distance(p, p) < 0.001);
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = GeoPoint::new(46.9911, 15.4396);
        let b = GeoPoint::new(47.0100, 15.4500);
        let d1 = haversine_distance(a, b);
        let d2 = haversine_distance(b, a);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn bearing_due_north_and_east() {
        let origin = GeoPoint::new(46.0, 15.0);
        let north = initial_bearing(origin, GeoPoint::new(47.0, 15.0));
        assert!(north.abs() < 0.01);

        let east = initial_bearing(origin, GeoPoint::new(46.0, 15.01));
        assert!((east - 90.0).abs() < 0.1);
    }

    #[test]
    fn bearing_coincident_points_is_deterministic() {
        let p = GeoPoint::new(46.9911, 15.4396);
        assert_eq!(initial_bearing(p, p), 0.0);
    }

    #[test]
    fn offset_by_bearing_round_trip() {
        let origin = GeoPoint::new(46.9911, 15.4396);
        let moved = offset_by_bearing(origin, 1000.0, 45.0);
        let dist = haversine_distance(origin, moved);
        assert!((dist - 1000.0).abs() < 1.0);
        let back = initial_bearing(origin, moved);
        assert!((back - 45.0).abs() < 0.5);
    }

    #[test]
    fn degenerate_segment_returns_infinity() {
        let p = GeoPoint::new(46.9911, 15.4396);
        let s = GeoPoint::new(46.9920, 15.4400);
        assert_eq!(distance_to_segment(p, s, s), f64::INFINITY);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = GeoPoint::new(46.9900, 15.4300);
        let b = GeoPoint::new(46.9900, 15.4400);
        // Point beyond the 'b' endpoint along the segment direction.
        let p = GeoPoint::new(46.9900, 15.4500);

        let d = distance_to_segment(p, a, b);
        let to_b = haversine_distance(p, b);
        assert!((d - to_b).abs() < 1.0, "clamped distance {d} vs endpoint {to_b}");
    }

    #[test]
    fn segment_distance_never_exceeds_nearer_endpoint() {
        let a = GeoPoint::new(46.9900, 15.4300);
        let b = GeoPoint::new(46.9950, 15.4400);
        let p = GeoPoint::new(46.9930, 15.4320);

        let d = distance_to_segment(p, a, b);
        let bound = haversine_distance(p, a).max(haversine_distance(p, b));
        assert!(d <= bound + 1.0);
    }

    #[test]
    fn perpendicular_distance_matches_planar_offset() {
        let base = GeoPoint::new(46.9900, 15.4300);
        let a = base;
        let b = GeoPoint::new(46.9900, 15.4400);
        // 50 m north of the segment midpoint.
        let mid = GeoPoint::new(46.9900, 15.4350);
        let p = offset_by_bearing(mid, 50.0, 0.0);

        let d = distance_to_segment(p, a, b);
        assert!((d - 50.0).abs() < 0.5, "expected ~50m, got {d}");
    }
}
