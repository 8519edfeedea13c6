//! Render-surface collaborator contract.
//!
//! The map surface is a single shared mutable resource owned by the layer
//! controller. It exposes source/layer registration, viewport-fit, camera
//! transitions and cursor styling; rendering primitives themselves live on
//! the other side of this trait.

use crate::error::Result;
use crate::geometry::{Envelope, FeatureCollection};

/// Paint style for the track-point circle layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CirclePaint {
    /// Circle radius in pixels
    pub radius: f64,
    /// CSS color string
    pub color: String,
    /// Opacity in [0, 1]
    pub opacity: f64,
}

impl Default for CirclePaint {
    fn default() -> Self {
        Self {
            radius: 3.0,
            color: "#ff8c00".to_string(),
            opacity: 0.8,
        }
    }
}

/// Options for a camera fit over an envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    /// Padding around the envelope in pixels; always positive
    pub padding: f64,
    /// Zoom cap; the surface must not zoom past this when fitting
    pub max_zoom: f64,
    /// Camera pitch in degrees
    pub pitch: f64,
    /// Camera bearing in degrees
    pub bearing: f64,
}

/// Options for an eased camera transition.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraOptions {
    pub zoom: Option<f64>,
    pub pitch: Option<f64>,
    pub bearing: Option<f64>,
    /// Transition duration in milliseconds
    pub duration_ms: u32,
}

/// Pointer cursor styles used by the hover hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// Contract consumed by the layer controller.
///
/// Only the controller registers and unregisters sources and layers; it
/// never holds more than one active source/layer pair for track data.
pub trait RenderSurface: Send {
    /// Register a geometry source under `id`.
    fn add_source(&mut self, id: &str, collection: &FeatureCollection) -> Result<()>;

    /// Register a circle layer under `id`, backed by `source_id`.
    fn add_layer(&mut self, id: &str, source_id: &str, paint: &CirclePaint) -> Result<()>;

    /// Remove a registered layer.
    fn remove_layer(&mut self, id: &str) -> Result<()>;

    /// Remove a registered source.
    fn remove_source(&mut self, id: &str) -> Result<()>;

    /// Fit the camera to an envelope.
    fn fit_bounds(&mut self, envelope: &Envelope, options: &FitOptions);

    /// Current zoom level.
    fn zoom(&self) -> f64;

    /// Ease the camera to the given state.
    fn ease_to(&mut self, options: &CameraOptions);

    /// Set the pointer cursor.
    fn set_cursor(&mut self, cursor: Cursor);
}
