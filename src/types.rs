//! Data model for the location-history dataset.
//!
//! Track points and the per-load summary are transient, re-created on every
//! time-window query. City and daily statistics are pre-aggregated by the
//! external data service, fetched once per session and held immutably.

use serde::{Deserialize, Serialize};

// ============================================================================
// Track Points
// ============================================================================

/// One observed location fix. Immutable once received.
///
/// Optional channels are absent when the recording device did not provide
/// them for this fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPoint {
    pub id: i64,
    /// Unix timestamp (seconds since epoch)
    pub timestamp: i64,
    /// Provider-specific location source code (GPS, network, ...)
    pub location_type: i16,
    pub longitude: f64,
    pub latitude: f64,
    /// Heading in degrees
    pub heading: Option<f64>,
    /// Horizontal accuracy in meters
    pub accuracy: Option<f64>,
    /// Speed in m/s
    pub speed: Option<f64>,
    /// Distance since previous fix in meters
    pub distance: Option<f64>,
    /// Altitude in meters
    pub altitude: Option<f64>,
}

/// Summary of the currently loaded time window. Recomputed on every load,
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    /// Aggregate distance over the window, in kilometers (two decimals)
    pub total_distance_km: f64,
    /// Number of points in the loaded geometry collection
    pub count: usize,
    /// Most recent fix of the window, if any
    pub current_point: Option<TrackPoint>,
}

// ============================================================================
// Pre-Aggregated Statistics
// ============================================================================

/// Classification of a calendar day used to partition daily statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Workday,
    Weekend,
}

/// Visit statistics for one distinct city. A city with zero visits is
/// absent from the dataset, not zero-valued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityStats {
    pub city_name: String,
    pub province_name: String,
    /// Unix timestamp of the first recorded fix in this city
    pub first_visit_time: i64,
    /// Unix timestamp of the most recent recorded fix in this city
    pub last_visit_time: i64,
    pub total_points: i64,
    /// Number of distinct days with at least one fix; always >= 1
    pub visit_days: u32,
    /// Average altitude in meters
    pub avg_altitude: f64,
    /// Average speed in m/s
    pub avg_speed: f64,
    /// Ordinal of first visit across all cities (1 = earliest)
    pub visit_order: u32,
    /// Ordinal by point count across all cities (1 = most points)
    pub frequency_rank: u32,
}

/// Activity statistics for one (city, day type) pair. A city may have a
/// workday row, a weekend row, or both, but never duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub day_type: DayType,
    pub city_name: String,
    pub province_name: String,
    pub total_points: i64,
    /// Number of days contributing to this row; always >= 1
    pub days_count: u32,
    /// Average speed in m/s
    pub avg_speed: f64,
    /// Average altitude in meters
    pub avg_altitude: f64,
    /// Total distance in meters
    pub total_distance: f64,
    /// Average distance per day in meters
    pub distance_per_day: f64,
    /// Pre-computed ordinal ranking by the data service's criterion
    pub activity_rank: u32,
}

// ============================================================================
// Layer Introspection
// ============================================================================

/// Snapshot of one registered render layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source_id: String,
}

// ============================================================================
// Session State
// ============================================================================

/// Identity of the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub username: String,
    pub display_name: String,
}

/// Login state persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginState {
    pub is_logged_in: bool,
    pub user: Option<UserInfo>,
}

impl LoginState {
    /// The logged-out state.
    pub fn logged_out() -> Self {
        Self {
            is_logged_in: false,
            user: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_type_serialization() {
        assert_eq!(
            serde_json::to_string(&DayType::Workday).unwrap(),
            "\"workday\""
        );
        assert_eq!(
            serde_json::to_string(&DayType::Weekend).unwrap(),
            "\"weekend\""
        );
        let parsed: DayType = serde_json::from_str("\"weekend\"").unwrap();
        assert_eq!(parsed, DayType::Weekend);
    }

    #[test]
    fn test_track_point_camel_case() {
        let point = TrackPoint {
            id: 1,
            timestamp: 1700000000,
            location_type: 1,
            longitude: 116.4,
            latitude: 39.9,
            heading: Some(180.0),
            accuracy: None,
            speed: Some(1.2),
            distance: Some(10.0),
            altitude: Some(43.5),
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["locationType"], 1);
        assert!(json["accuracy"].is_null());
    }

    #[test]
    fn test_layer_info_type_field() {
        let info = LayerInfo {
            id: "track-data-layer".to_string(),
            kind: "circle".to_string(),
            source_id: "track-data-source".to_string(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "circle");
        assert_eq!(json["sourceId"], "track-data-source");
    }
}
