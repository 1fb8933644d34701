// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geolocation samples and the accepted points of a walking path.

use serde::{Deserialize, Serialize};

/// A raw position fix as delivered by the platform.
///
/// Samples may arrive out of order, and an `accuracy_meters` of 0 means the
/// platform did not report an accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of the 68% confidence circle in meters
    pub accuracy_meters: f64,
    /// Platform timestamp (Unix epoch, milliseconds)
    pub timestamp_ms: i64,
}

impl GeoSample {
    pub fn new(latitude: f64, longitude: f64, accuracy_meters: f64, timestamp_ms: i64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters,
            timestamp_ms,
        }
    }

    /// Check if the sample has usable coordinates.
    pub fn is_valid(&self) -> bool {
        valid_coordinates(self.latitude, self.longitude)
    }
}

/// A sample that passed the filter and became part of the recorded path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: f64,
    pub timestamp_ms: i64,
}

impl PathPoint {
    /// Coordinate pair in map order (`[longitude, latitude]`).
    pub fn coordinate(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    pub fn is_valid(&self) -> bool {
        valid_coordinates(self.latitude, self.longitude)
    }
}

impl From<GeoSample> for PathPoint {
    fn from(sample: GeoSample) -> Self {
        Self {
            latitude: sample.latitude,
            longitude: sample.longitude,
            accuracy_meters: sample.accuracy_meters,
            timestamp_ms: sample.timestamp_ms,
        }
    }
}

/// Anything that can be placed on the globe.
///
/// Implemented for samples, path points, `[lon, lat]` pairs and `geo::Point`
/// (x = longitude, y = latitude) so the distance functions work on all of them.
pub trait HasCoordinates {
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;
}

impl HasCoordinates for GeoSample {
    fn latitude(&self) -> f64 {
        self.latitude
    }
    fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl HasCoordinates for PathPoint {
    fn latitude(&self) -> f64 {
        self.latitude
    }
    fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl HasCoordinates for [f64; 2] {
    fn latitude(&self) -> f64 {
        self[1]
    }
    fn longitude(&self) -> f64 {
        self[0]
    }
}

impl HasCoordinates for geo::Point<f64> {
    fn latitude(&self) -> f64 {
        self.y()
    }
    fn longitude(&self) -> f64 {
        self.x()
    }
}

impl<T: HasCoordinates> HasCoordinates for &T {
    fn latitude(&self) -> f64 {
        (*self).latitude()
    }
    fn longitude(&self) -> f64 {
        (*self).longitude()
    }
}

pub(crate) fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}
