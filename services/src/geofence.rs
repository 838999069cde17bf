//! Great-circle geofencing.
//!
//! Distances use the haversine formula on a spherical Earth of mean radius
//! [`EARTH_RADIUS_METERS`]. Membership is inclusive: a point exactly on the
//! boundary is inside.

use crate::error::AttendanceError;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Validates latitude in `[-90, 90]` and longitude in `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, AttendanceError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if valid {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(AttendanceError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Re-checks a value that arrived through deserialization.
    pub fn validated(self) -> Result<Self, AttendanceError> {
        Self::new(self.latitude, self.longitude)
    }
}

/// Circular campus boundary. Static configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CampusLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

impl CampusLocation {
    pub fn new(latitude: f64, longitude: f64, radius_meters: f64) -> Result<Self, AttendanceError> {
        Coordinate::new(latitude, longitude)?;
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Err(AttendanceError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
            radius_meters,
        })
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        haversine_distance(self.center(), point) <= self.radius_meters
    }
}

/// Great-circle distance in meters.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// Whether `(latitude, longitude)` lies within `campus`.
pub fn is_within_campus(
    latitude: f64,
    longitude: f64,
    campus: &CampusLocation,
) -> Result<bool, AttendanceError> {
    let point = Coordinate::new(latitude, longitude)?;
    Ok(campus.contains(point))
}
