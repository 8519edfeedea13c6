//! # Footprint Map
//!
//! Map layer lifecycle and visit analytics for a personal location-history
//! dataset.
//!
//! This library provides:
//! - A [`TrackLayerController`] that owns the map's visual representation
//!   of one loaded time window: fetch, project to geometry, register on the
//!   render surface, fit the camera, tear down on re-query or disposal
//! - Pure aggregation over the pre-computed statistics datasets: ranking
//!   views, a log-normalized word cloud, workday/weekend summaries and
//!   comparison tables
//! - A file-backed session store
//!
//! Raw point storage, geodesic distance computation and the statistics
//! tables live behind the [`TrackService`] collaborator; rendering
//! primitives live behind [`RenderSurface`].
//!
//! ## Quick Start
//!
//! ```rust
//! use footprint_map::stats::{self, CloudConfig};
//! use footprint_map::CityStats;
//!
//! let cities = vec![
//!     CityStats {
//!         city_name: "Beijing".to_string(),
//!         province_name: "Beijing".to_string(),
//!         first_visit_time: 1_600_000_000,
//!         last_visit_time: 1_700_000_000,
//!         total_points: 48_213,
//!         visit_days: 311,
//!         avg_altitude: 43.5,
//!         avg_speed: 1.4,
//!         visit_order: 1,
//!         frequency_rank: 1,
//!     },
//!     CityStats {
//!         city_name: "Qingdao".to_string(),
//!         province_name: "Shandong".to_string(),
//!         first_visit_time: 1_650_000_000,
//!         last_visit_time: 1_660_000_000,
//!         total_points: 1_402,
//!         visit_days: 6,
//!         avg_altitude: 12.0,
//!         avg_speed: 1.9,
//!         visit_order: 2,
//!         frequency_rank: 2,
//!     },
//! ];
//!
//! let ranked = stats::rank_by_frequency(&cities);
//! assert_eq!(ranked[0].city_name, "Beijing");
//!
//! let mut rng = rand::thread_rng();
//! let cloud = stats::word_cloud(&cities, &CloudConfig::default(), &mut rng);
//! assert!(cloud.iter().all(|tag| (0.0..=1.0).contains(&tag.scale)));
//! ```

// Unified error handling
pub mod error;
pub use error::{FootprintError, Result};

// Data model for track points and pre-aggregated statistics
pub mod types;
pub use types::{
    CityStats, DailyStats, DayType, LayerInfo, LoginState, TrackInfo, TrackPoint, UserInfo,
};

// Point-feature projection and bounding envelopes
pub mod geometry;
pub use geometry::{Envelope, FeatureCollection, PointFeature};

// Render-surface collaborator contract
pub mod surface;
pub use surface::{CameraOptions, CirclePaint, Cursor, FitOptions, RenderSurface};

// Data-service collaborator contract
pub mod service;
pub use service::TrackService;

// Map-layer lifecycle controller
pub mod layer;
pub use layer::{ControllerState, LayerConfig, TrackLayerController, TrackLayerObserver};

// Analytics aggregation
pub mod stats;
pub use stats::{CityComparison, CloudConfig, CloudTag, DayTypeSummary, Overview};

// File-backed session state
pub mod session;
pub use session::{Credentials, SessionStore};
