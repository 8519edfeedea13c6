//! Map-layer lifecycle controller for track points.
//!
//! The controller owns the visual representation of one loaded time window:
//! fetch points from the data service, project them to a geometry
//! collection, register the collection on the render surface, fit the
//! camera, and tear everything down on re-query or disposal.
//!
//! ## State machine
//!
//! `Uninitialized -> Loading -> Active <-> Loading -> Destroyed` (terminal).
//! [`TrackLayerController::init`] performs the initial load over the
//! configured default window and fetches the two immutable analytics
//! datasets for the session. A later [`TrackLayerController::load_data`]
//! re-enters `Loading`, tearing the active source/layer pair down before
//! installing the new one, so at most one pair exists at any time.
//!
//! ## Limitations
//!
//! Calls are not coalesced: the controller is single-instance, not
//! single-flight. Issuing a second `load_data` while one is in flight
//! produces undefined teardown/install ordering; callers are responsible
//! for not overlapping requests on one instance.

use std::sync::Arc;

use log::{debug, info, warn};
use rand::Rng;

use crate::error::{FootprintError, Result};
use crate::geometry::{Envelope, FeatureCollection};
use crate::service::TrackService;
use crate::surface::{CameraOptions, CirclePaint, Cursor, FitOptions, RenderSurface};
use crate::types::{CityStats, DailyStats, LayerInfo, TrackInfo};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the layer controller.
#[derive(Debug, Clone)]
pub struct LayerConfig {
    /// Render-surface id for the track geometry source.
    pub source_id: String,
    /// Render-surface id for the track circle layer.
    pub layer_id: String,
    /// Paint style for the circle layer.
    pub paint: CirclePaint,
    /// Camera-fit padding in pixels. Default: 40.0
    pub fit_padding: f64,
    /// Camera-fit zoom cap. Default: 16.0
    pub fit_max_zoom: f64,
    /// Camera-fit pitch range in degrees; the pitch is drawn uniformly
    /// from it on every fit. Default: 0..60
    pub fit_pitch_min: f64,
    pub fit_pitch_max: f64,
    /// Camera-fit bearing range in degrees. Default: -30..30
    pub fit_bearing_min: f64,
    pub fit_bearing_max: f64,
    /// Window loaded by `init`, inclusive epoch seconds.
    pub default_window: (i64, i64),
    /// Zoom level separating the "close" and "far" analyze transitions.
    /// Default: 9.0
    pub analyze_zoom_split: f64,
    /// Zoom delta applied by the analyze transition. Default: 3.0
    pub analyze_zoom_step: f64,
    /// Pitch for the tilted analyze view, degrees. Default: 60.0
    pub analyze_pitch: f64,
    /// Analyze transition duration in milliseconds. Default: 1200
    pub analyze_duration_ms: u32,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            source_id: "track-data-source".to_string(),
            layer_id: "track-data-layer".to_string(),
            paint: CirclePaint::default(),
            fit_padding: 40.0,
            fit_max_zoom: 16.0,
            fit_pitch_min: 0.0,
            fit_pitch_max: 60.0,
            fit_bearing_min: -30.0,
            fit_bearing_max: 30.0,
            default_window: (0, 180_000_000_000),
            analyze_zoom_split: 9.0,
            analyze_zoom_step: 3.0,
            analyze_pitch: 60.0,
            analyze_duration_ms: 1200,
        }
    }
}

// ============================================================================
// Observation
// ============================================================================

/// Lifecycle notifications published by the controller.
///
/// All methods default to no-ops so observers implement only what they
/// consume. Operations also return their results directly; observation is
/// for presentation layers that track loading flags and summaries outside
/// the call site.
pub trait TrackLayerObserver: Send + Sync {
    /// The loading flag flipped. Set before a fetch, cleared after both
    /// load sub-operations complete, including on failure.
    fn loading_changed(&self, _loading: bool) {}

    /// A load finished and produced a fresh window summary.
    fn info_changed(&self, _info: &TrackInfo) {}

    /// `analyze` ran; present the session's precomputed statistics.
    fn analytics_opened(&self, _cities: &[CityStats], _daily: &[DailyStats]) {}
}

/// Controller lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    Loading,
    Active,
    Destroyed,
}

// ============================================================================
// Controller
// ============================================================================

/// Owns the lifecycle of the map's track-point representation.
pub struct TrackLayerController<S, R> {
    service: S,
    surface: R,
    config: LayerConfig,
    state: ControllerState,
    // At most one active source/layer pair exists; a single optional slot
    // per resource kind carries that invariant.
    active_source: Option<String>,
    active_layer: Option<String>,
    info: TrackInfo,
    cities: Vec<CityStats>,
    daily: Vec<DailyStats>,
    observers: Vec<Arc<dyn TrackLayerObserver>>,
}

impl<S: TrackService, R: RenderSurface> TrackLayerController<S, R> {
    /// Create an uninitialized controller. Call [`init`](Self::init) to
    /// perform the initial load.
    pub fn new(service: S, surface: R, config: LayerConfig) -> Self {
        Self {
            service,
            surface,
            config,
            state: ControllerState::Uninitialized,
            active_source: None,
            active_layer: None,
            info: TrackInfo::default(),
            cities: Vec::new(),
            daily: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer for lifecycle notifications.
    pub fn subscribe(&mut self, observer: Arc<dyn TrackLayerObserver>) {
        self.observers.push(observer);
    }

    /// Fetch the session's analytics datasets and load the default window.
    pub async fn init(&mut self) -> Result<TrackInfo> {
        if self.state != ControllerState::Uninitialized {
            return Err(FootprintError::InvalidState { state: self.state });
        }

        let service = &self.service;
        let (cities, daily) = tokio::join!(service.get_city_stats(), service.get_daily_stats());
        self.cities = cities?;
        self.daily = daily?;
        debug!(
            "analytics datasets loaded: {} cities, {} daily rows",
            self.cities.len(),
            self.daily.len()
        );

        let (start_time, end_time) = self.config.default_window;
        self.load_data(start_time, end_time).await
    }

    /// Load the window `[start_time, end_time]` (inclusive epoch seconds)
    /// and replace the active layer with its geometry.
    ///
    /// Window ordering is not validated: an inverted window yields zero
    /// points and zero distance, not an error. After the points arrive, the
    /// layer installation (including the camera fit) and the window
    /// distance query run concurrently; the loading flag clears only once
    /// both finish, whatever their outcome.
    pub async fn load_data(&mut self, start_time: i64, end_time: i64) -> Result<TrackInfo> {
        if self.state == ControllerState::Destroyed {
            return Err(FootprintError::InvalidState { state: self.state });
        }

        self.state = ControllerState::Loading;
        self.notify_loading(true);
        let result = self.load_window(start_time, end_time).await;
        self.notify_loading(false);
        // A failed load leaves the controller usable, if stale.
        self.state = ControllerState::Active;

        let info = match result {
            Ok(info) => info,
            Err(err) => {
                warn!("window load failed: {err}");
                return Err(err);
            }
        };
        self.info = info.clone();
        for observer in &self.observers {
            observer.info_changed(&info);
        }
        Ok(info)
    }

    async fn load_window(&mut self, start_time: i64, end_time: i64) -> Result<TrackInfo> {
        self.teardown_active()?;

        debug!("querying window [{start_time}, {end_time}]");
        let points = self.service.get_track_data(start_time, end_time).await?;
        let collection = FeatureCollection::from_points(&points);
        let count = collection.len();
        let current_point = points.iter().max_by_key(|p| p.timestamp).cloned();

        let service = &self.service;
        let surface = &mut self.surface;
        let active_source = &mut self.active_source;
        let active_layer = &mut self.active_layer;
        let config = &self.config;

        let install = async move {
            install_layers(surface, active_source, active_layer, config, &collection)
        };
        let distance = async move { service.get_total_distance(start_time, end_time).await };
        let (installed, meters) = tokio::join!(install, distance);
        installed?;
        let total_distance_km = round2(meters? / 1000.0);

        info!("window loaded: {count} points, {total_distance_km} km");
        Ok(TrackInfo {
            total_distance_km,
            count,
            current_point,
        })
    }

    /// Snapshot of currently registered layer descriptors. Read-only.
    pub fn layers_info(&self) -> Vec<LayerInfo> {
        match (&self.active_layer, &self.active_source) {
            (Some(layer), Some(source)) => vec![LayerInfo {
                id: layer.clone(),
                kind: "circle".to_string(),
                source_id: source.clone(),
            }],
            _ => Vec::new(),
        }
    }

    /// Transition the camera for the analytics view and publish the
    /// session's precomputed statistics.
    ///
    /// Close to the ground the camera pulls back and tilts up for a
    /// regional view; far out it pushes in and flattens.
    pub fn analyze(&mut self) -> Result<()> {
        if self.state == ControllerState::Destroyed {
            return Err(FootprintError::InvalidState { state: self.state });
        }

        let zoom = self.surface.zoom();
        let camera = if zoom >= self.config.analyze_zoom_split {
            CameraOptions {
                zoom: Some(zoom - self.config.analyze_zoom_step),
                pitch: Some(self.config.analyze_pitch),
                bearing: None,
                duration_ms: self.config.analyze_duration_ms,
            }
        } else {
            CameraOptions {
                zoom: Some(zoom + self.config.analyze_zoom_step),
                pitch: Some(0.0),
                bearing: None,
                duration_ms: self.config.analyze_duration_ms,
            }
        };
        debug!("analyze transition from zoom {zoom:.1}");
        self.surface.ease_to(&camera);

        for observer in &self.observers {
            observer.analytics_opened(&self.cities, &self.daily);
        }
        Ok(())
    }

    /// Tear down all registered layers, then all registered sources.
    ///
    /// Idempotent and safe to call at any point of the lifecycle,
    /// including before a full initialization. Terminal: subsequent loads
    /// are rejected.
    pub fn destroy(&mut self) -> Result<()> {
        self.teardown_active()?;
        self.state = ControllerState::Destroyed;
        info!("track layer controller destroyed");
        Ok(())
    }

    /// Hover entered the given layer; cursor-styling only, no data effect.
    pub fn pointer_entered(&mut self, layer_id: &str) {
        if self.active_layer.as_deref() == Some(layer_id) {
            self.surface.set_cursor(Cursor::Pointer);
        }
    }

    /// Hover left the given layer.
    pub fn pointer_left(&mut self, layer_id: &str) {
        if self.active_layer.as_deref() == Some(layer_id) {
            self.surface.set_cursor(Cursor::Default);
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Summary of the currently loaded window.
    pub fn track_info(&self) -> &TrackInfo {
        &self.info
    }

    /// The session's immutable city statistics.
    pub fn city_stats(&self) -> &[CityStats] {
        &self.cities
    }

    /// The session's immutable daily statistics.
    pub fn daily_stats(&self) -> &[DailyStats] {
        &self.daily
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    fn teardown_active(&mut self) -> Result<()> {
        teardown(
            &mut self.surface,
            &mut self.active_layer,
            &mut self.active_source,
        )
    }

    fn notify_loading(&self, loading: bool) {
        for observer in &self.observers {
            observer.loading_changed(loading);
        }
    }
}

// Free functions so the install sub-operation can borrow the surface and
// slots disjointly from the service during the concurrent join.

fn teardown<R: RenderSurface>(
    surface: &mut R,
    active_layer: &mut Option<String>,
    active_source: &mut Option<String>,
) -> Result<()> {
    if let Some(layer) = active_layer.take() {
        surface.remove_layer(&layer)?;
        debug!("removed layer {layer}");
    }
    if let Some(source) = active_source.take() {
        surface.remove_source(&source)?;
        debug!("removed source {source}");
    }
    Ok(())
}

fn install_layers<R: RenderSurface>(
    surface: &mut R,
    active_source: &mut Option<String>,
    active_layer: &mut Option<String>,
    config: &LayerConfig,
    collection: &FeatureCollection,
) -> Result<()> {
    surface.add_source(&config.source_id, collection)?;
    *active_source = Some(config.source_id.clone());
    surface.add_layer(&config.layer_id, &config.source_id, &config.paint)?;
    *active_layer = Some(config.layer_id.clone());

    // Nothing to frame for an empty window; the camera stays put.
    if let Some(envelope) = Envelope::from_collection(collection) {
        let mut rng = rand::thread_rng();
        let options = FitOptions {
            padding: config.fit_padding,
            max_zoom: config.fit_max_zoom,
            pitch: rng.gen_range(config.fit_pitch_min..=config.fit_pitch_max),
            bearing: rng.gen_range(config.fit_bearing_min..=config.fit_bearing_max),
        };
        surface.fit_bounds(&envelope, &options);
    }
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayerConfig::default();
        assert_eq!(config.source_id, "track-data-source");
        assert_eq!(config.layer_id, "track-data-layer");
        assert!(config.fit_padding > 0.0);
        assert!(config.fit_pitch_min <= config.fit_pitch_max);
        assert!(config.fit_bearing_min <= config.fit_bearing_max);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.345678), 12.35);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(0.1 + 0.2), 0.3);
    }
}
