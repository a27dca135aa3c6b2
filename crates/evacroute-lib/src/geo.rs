//! Geographic coordinate type and great-circle helpers.
//!
//! Distances use the haversine formula on a spherical Earth. That is accurate
//! to a few metres at the kilometre scale of a city road network; it is not
//! intended for survey-grade precision.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Initial compass bearing towards `other`, in degrees within `[0, 360)`.
    pub fn bearing_to(&self, other: &Self) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        y.atan2(x).to_degrees().rem_euclid(360.0)
    }

    /// Arithmetic midpoint. Good enough for segments a few kilometres long.
    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            lat: (self.lat + other.lat) / 2.0,
            lon: (self.lon + other.lon) / 2.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Haversine distance in metres between two coordinates.
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    a.distance_to(b)
}

/// Initial bearing in degrees from `from` towards `to`.
pub fn initial_bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    from.bearing_to(to)
}

/// Signed change of heading in degrees, within `(-180, 180]`.
///
/// Positive values are clockwise (a right turn), negative values are
/// counter-clockwise (a left turn).
pub fn bearing_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Eight-point compass label for a bearing.
pub fn compass_label(bearing: f64) -> &'static str {
    const LABELS: [&str; 8] = [
        "north",
        "northeast",
        "east",
        "southeast",
        "south",
        "southwest",
        "west",
        "northwest",
    ];
    let sector = ((bearing.rem_euclid(360.0) + 22.5) / 45.0) as usize % 8;
    LABELS[sector]
}
