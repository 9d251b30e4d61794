use slotmap::SlotMap;

use crate::math::{Aabb, Matrix4};

use super::{Material, ViewMode};

/// Name fragments of meshes shown only from outside.
const EXTERNAL_TERMS: [&str; 2] = ["external", "outer"];
/// Name fragments of meshes shown only in the cut-away view.
const INTERNAL_TERMS: [&str; 2] = ["internal", "inner"];

slotmap::new_key_type! {
    /// Unique identifier for a mesh in a loaded model.
    pub struct MeshId;
}

/// Data associated with one mesh of the heart model.
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Name from the model file, used for selector matching.
    pub name: String,
    /// Parent node, `None` for top-level meshes.
    pub parent: Option<MeshId>,
    /// Current surface material.
    pub material: Material,
    /// Whether the mesh is drawn.
    pub visible: bool,
    /// Model-space bounds, if the loader computed them.
    pub bounds: Option<Aabb>,
}

impl MeshData {
    /// Creates a visible top-level mesh with the default material.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            material: Material::default(),
            visible: true,
            bounds: None,
        }
    }

    /// Sets the parent node.
    #[must_use]
    pub fn with_parent(mut self, parent: MeshId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the model-space bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Arena holding the mesh hierarchy of a loaded heart model.
///
/// Meshes reference their parents via typed IDs (generational indices).
/// The root transform applies to the whole organ.
#[derive(Debug, Clone)]
pub struct ModelGraph {
    meshes: SlotMap<MeshId, MeshData>,
    root_transform: Matrix4,
}

impl Default for ModelGraph {
    fn default() -> Self {
        Self {
            meshes: SlotMap::with_key(),
            root_transform: Matrix4::identity(),
        }
    }
}

impl ModelGraph {
    /// Creates a new, empty model graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mesh and returns its ID.
    pub fn add_mesh(&mut self, data: MeshData) -> MeshId {
        self.meshes.insert(data)
    }

    /// Returns the mesh data, if the ID is live.
    #[must_use]
    pub fn mesh(&self, id: MeshId) -> Option<&MeshData> {
        self.meshes.get(id)
    }

    /// Returns mutable mesh data, if the ID is live.
    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut MeshData> {
        self.meshes.get_mut(id)
    }

    /// Iterates over all meshes.
    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &MeshData)> {
        self.meshes.iter()
    }

    /// Returns the IDs of all meshes matching a predicate, in insertion order.
    #[must_use]
    pub fn find<P>(&self, predicate: P) -> Vec<MeshId>
    where
        P: Fn(&MeshData) -> bool,
    {
        self.meshes
            .iter()
            .filter(|(_, mesh)| predicate(mesh))
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns the number of meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Returns whether the model holds no meshes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Returns the union of all mesh bounds, or `None` if no mesh has bounds.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.meshes
            .values()
            .filter_map(|m| m.bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Shows or hides shell and interior meshes for a view mode.
    ///
    /// Meshes whose names carry neither keyword keep their visibility.
    pub fn apply_view(&mut self, mode: ViewMode) {
        let internal = mode == ViewMode::Internal;
        for mesh in self.meshes.values_mut() {
            let name = mesh.name.to_lowercase();
            if EXTERNAL_TERMS.iter().any(|t| name.contains(t)) {
                mesh.visible = !internal;
            }
            if INTERNAL_TERMS.iter().any(|t| name.contains(t)) {
                mesh.visible = internal;
            }
        }
    }

    /// Returns the transform applied to the whole organ.
    #[must_use]
    pub fn root_transform(&self) -> &Matrix4 {
        &self.root_transform
    }

    /// Replaces the organ transform.
    pub fn set_root_transform(&mut self, transform: Matrix4) {
        self.root_transform = transform;
    }
}
