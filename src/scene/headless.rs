use slotmap::SlotMap;

use crate::math::{Matrix4, Point3};

use super::{Camera, Color, Lighting, MarkerStyle, ModelGraph, ObjectId, Scene};

/// A particle marker held by [`HeadlessScene`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub style: MarkerStyle,
    pub position: Point3,
}

/// In-memory [`Scene`] that records state instead of drawing.
///
/// Useful for offscreen runs and for inspecting what a frame would show.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    markers: SlotMap<ObjectId, Marker>,
    background: Option<Color>,
    lighting: Option<Lighting>,
    frames_rendered: usize,
    last_camera: Option<Camera>,
    last_transform: Option<Matrix4>,
    released: bool,
}

impl HeadlessScene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live markers.
    pub fn markers(&self) -> impl Iterator<Item = (ObjectId, &Marker)> {
        self.markers.iter()
    }

    /// Returns a marker by handle.
    #[must_use]
    pub fn marker(&self, id: ObjectId) -> Option<&Marker> {
        self.markers.get(id)
    }

    /// Returns the number of live markers.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Returns the clear color, once set.
    #[must_use]
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    /// Returns the installed lights, once set.
    #[must_use]
    pub fn lighting(&self) -> Option<&Lighting> {
        self.lighting.as_ref()
    }

    /// Returns how many frames were rendered.
    #[must_use]
    pub fn frames_rendered(&self) -> usize {
        self.frames_rendered
    }

    /// Returns the camera used for the last frame.
    #[must_use]
    pub fn last_camera(&self) -> Option<&Camera> {
        self.last_camera.as_ref()
    }

    /// Returns the organ transform seen by the last frame.
    #[must_use]
    pub fn last_transform(&self) -> Option<&Matrix4> {
        self.last_transform.as_ref()
    }

    /// Returns whether [`Scene::release`] was called.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Scene for HeadlessScene {
    fn set_background(&mut self, color: Color) {
        self.background = Some(color);
    }

    fn set_lighting(&mut self, lighting: &Lighting) {
        self.lighting = Some(*lighting);
    }

    fn add_marker(&mut self, style: MarkerStyle, position: Point3) -> ObjectId {
        self.markers.insert(Marker { style, position })
    }

    fn set_marker_position(&mut self, id: ObjectId, position: Point3) {
        if let Some(marker) = self.markers.get_mut(id) {
            marker.position = position;
        }
    }

    fn remove_marker(&mut self, id: ObjectId) {
        self.markers.remove(id);
    }

    fn render(&mut self, camera: &Camera, model: &ModelGraph) {
        self.frames_rendered += 1;
        self.last_camera = Some(*camera);
        self.last_transform = Some(*model.root_transform());
    }

    fn release(&mut self) {
        self.markers.clear();
        self.released = true;
    }
}
