//! Seams to the rendering substrate.
//!
//! The engine never talks to a GPU. It mutates a [`ModelGraph`] it owns and
//! drives a [`Scene`] that knows how to draw that graph plus a set of
//! lightweight particle markers.

mod headless;
mod material;
mod model;

pub use headless::{HeadlessScene, Marker};
pub use material::{Color, Material};
pub use model::{MeshData, MeshId, ModelGraph};

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::math::Point3;

/// Whether the organ is seen from outside or cut away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Internal,
    External,
}

slotmap::new_key_type! {
    /// Handle to a renderable object owned by a [`Scene`].
    pub struct ObjectId;
}

/// Appearance of a blood-flow particle marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub color: Color,
    pub radius: f64,
}

/// Ambient plus one directional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient_intensity: f64,
    pub directional_intensity: f64,
    pub directional_position: Point3,
}

/// Perspective camera looking at the organ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3,
    pub target: Point3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    /// Creates a camera on the +Z axis at `distance` from the origin.
    #[must_use]
    pub fn looking_at_origin(distance: f64, fov_degrees: f64, near: f64, far: f64) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, distance),
            target: Point3::origin(),
            fov_degrees,
            aspect: 1.0,
            near,
            far,
        }
    }

    /// Updates the aspect ratio for a new viewport size. A zero-height
    /// viewport leaves the camera unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect = f64::from(width) / f64::from(height);
    }
}

/// Rendering substrate consumed by the viewer.
///
/// Implementations are driven from a single thread, once per display
/// refresh.
pub trait Scene {
    /// Sets the clear color.
    fn set_background(&mut self, color: Color);

    /// Installs the scene lights.
    fn set_lighting(&mut self, lighting: &Lighting);

    /// Adds a particle marker and returns its handle.
    fn add_marker(&mut self, style: MarkerStyle, position: Point3) -> ObjectId;

    /// Moves a marker. Unknown handles are ignored.
    fn set_marker_position(&mut self, id: ObjectId, position: Point3);

    /// Removes a marker. Unknown handles are ignored.
    fn remove_marker(&mut self, id: ObjectId);

    /// Draws one frame of the model and all markers.
    fn render(&mut self, camera: &Camera, model: &ModelGraph);

    /// Releases every resource held by the scene.
    fn release(&mut self);
}

/// Source of heart models (file, network, or fixture).
pub trait ModelLoader {
    /// Loads the model at `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be fetched or decoded.
    fn load(&mut self, source: &str) -> Result<ModelGraph, LoadError>;
}
