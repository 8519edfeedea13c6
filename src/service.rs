//! Data-service collaborator contract.
//!
//! The external data service owns raw point storage, geodesic distance
//! computation and the pre-aggregated statistics tables. This core only
//! queries it; transport is the implementer's concern and the calls are
//! treated as local procedure calls.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CityStats, DailyStats, TrackPoint};

/// Query operations exposed by the external data service.
///
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait TrackService: Send + Sync {
    /// Fetch raw points for the inclusive window `[start_time, end_time]`
    /// (epoch seconds). Ordering is unspecified; the result may be empty,
    /// and an inverted window yields an empty result rather than an error.
    async fn get_track_data(&self, start_time: i64, end_time: i64) -> Result<Vec<TrackPoint>>;

    /// Aggregate distance over the window, in meters. Zero for an empty
    /// window.
    async fn get_total_distance(&self, start_time: i64, end_time: i64) -> Result<f64>;

    /// The full per-city statistics dataset (not time-windowed).
    async fn get_city_stats(&self) -> Result<Vec<CityStats>>;

    /// The full per-(city, day type) statistics dataset (not time-windowed).
    async fn get_daily_stats(&self) -> Result<Vec<DailyStats>>;
}
