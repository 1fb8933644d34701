// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map data for drawing a walk: coordinates, polyline, GeoJSON and
//! per-segment accuracy grades.

use geo::{BoundingRect, LineString};
use serde::Serialize;

use crate::models::PathPoint;
use crate::tracking::cumulative_distance;

/// Polyline precision (5 decimal places, the common GPS encoding).
const POLYLINE_PRECISION: u32 = 5;

/// Display grade of reported accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyGrade {
    Good,
    Fair,
    Poor,
}

impl AccuracyGrade {
    pub fn from_accuracy(accuracy_meters: f64) -> Self {
        if accuracy_meters < 20.0 {
            AccuracyGrade::Good
        } else if accuracy_meters < 50.0 {
            AccuracyGrade::Fair
        } else {
            AccuracyGrade::Poor
        }
    }

    /// A segment is only as good as its worse endpoint.
    pub fn for_segment(a: &PathPoint, b: &PathPoint) -> Self {
        Self::from_accuracy(a.accuracy_meters).max(Self::from_accuracy(b.accuracy_meters))
    }
}

/// Errors from map data conversion.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Failed to encode polyline: {0}")]
    Encode(String),

    #[error("Failed to decode polyline: {0}")]
    Decode(String),
}

/// Everything a map view needs for one path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapTrace {
    /// `[longitude, latitude]` pairs
    pub coordinates: Vec<[f64; 2]>,
    pub polyline: String,
    /// One grade per consecutive pair of points (empty when accuracy is
    /// unknown)
    pub segments: Vec<AccuracyGrade>,
    /// `[min_lon, min_lat, max_lon, max_lat]`
    pub bounds: Option<[f64; 4]>,
    pub distance_meters: f64,
}

impl MapTrace {
    pub fn from_points(points: &[PathPoint]) -> Result<Self, MapError> {
        let coordinates: Vec<[f64; 2]> = points.iter().map(PathPoint::coordinate).collect();
        let segments = points
            .windows(2)
            .map(|pair| AccuracyGrade::for_segment(&pair[0], &pair[1]))
            .collect();
        Self::build(coordinates, segments)
    }

    /// Trace for a bare `[longitude, latitude]` path. Without accuracy
    /// there is nothing to grade, so `segments` stays empty.
    pub fn from_coordinates(coordinates: &[[f64; 2]]) -> Result<Self, MapError> {
        Self::build(coordinates.to_vec(), Vec::new())
    }

    fn build(coordinates: Vec<[f64; 2]>, segments: Vec<AccuracyGrade>) -> Result<Self, MapError> {
        let line = to_line_string(&coordinates);

        let polyline = polyline::encode_coordinates(line.clone(), POLYLINE_PRECISION)
            .map_err(|e| MapError::Encode(e.to_string()))?;

        let bounds = line
            .bounding_rect()
            .map(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y]);

        Ok(Self {
            distance_meters: cumulative_distance(&coordinates),
            coordinates,
            polyline,
            segments,
            bounds,
        })
    }

    /// The path as a GeoJSON `Feature` with a LineString geometry.
    pub fn to_feature(&self) -> geojson::Feature {
        let line = to_line_string(&self.coordinates);
        let geometry = geojson::Geometry::new(geojson::Value::from(&line));

        let mut properties = geojson::JsonObject::new();
        properties.insert(
            "distance_meters".to_string(),
            serde_json::json!(self.distance_meters),
        );
        properties.insert(
            "point_count".to_string(),
            serde_json::json!(self.coordinates.len()),
        );

        geojson::Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// Decode a precision-5 polyline back into `[longitude, latitude]` pairs.
pub fn decode_path(encoded: &str) -> Result<Vec<[f64; 2]>, MapError> {
    let line = polyline::decode_polyline(encoded, POLYLINE_PRECISION)
        .map_err(|e| MapError::Decode(e.to_string()))?;
    Ok(line.coords().map(|c| [c.x, c.y]).collect())
}

fn to_line_string(coordinates: &[[f64; 2]]) -> LineString<f64> {
    coordinates.iter().map(|[lon, lat]| (*lon, *lat)).collect()
}

/// `"523m"` below a kilometer, `"1.23km"` above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round() as i64)
    } else {
        format!("{:.2}km", meters / 1000.0)
    }
}
