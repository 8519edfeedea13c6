//! Point-geometry projection and bounding envelopes.
//!
//! Track points are projected into a GeoJSON-shaped feature collection that
//! the render surface consumes verbatim. Every original attribute of a point
//! survives the projection as feature properties.

use serde::{Deserialize, Serialize};

use crate::types::TrackPoint;

/// Point geometry in GeoJSON coordinate order: `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

/// One projected track point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: PointGeometry,
    pub properties: TrackPoint,
}

impl PointFeature {
    fn from_point(point: TrackPoint) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: PointGeometry {
                kind: "Point".to_string(),
                coordinates: [point.longitude, point.latitude],
            },
            properties: point,
        }
    }
}

/// Geometry collection for one loaded time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<PointFeature>,
}

impl FeatureCollection {
    /// Project a point sequence into a feature collection, preserving all
    /// original attributes as feature properties.
    pub fn from_points(points: &[TrackPoint]) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features: points.iter().cloned().map(PointFeature::from_point).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Bounding envelope over feature coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl Envelope {
    /// Compute the envelope over all feature coordinates.
    ///
    /// Returns `None` for an empty collection.
    pub fn from_collection(collection: &FeatureCollection) -> Option<Self> {
        if collection.is_empty() {
            return None;
        }
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;

        for feature in &collection.features {
            let [lng, lat] = feature.geometry.coordinates;
            min_lng = min_lng.min(lng);
            max_lng = max_lng.max(lng);
            min_lat = min_lat.min(lat);
            max_lat = max_lat.max(lat);
        }

        Some(Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        })
    }

    /// Center point of the envelope as `[longitude, latitude]`.
    pub fn center(&self) -> [f64; 2] {
        [
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        ]
    }
}
