use slotmap::SecondaryMap;

use crate::scene::{MeshId, ModelGraph};

/// Tooltip text attached to meshes for the lifetime of a viewer.
#[derive(Debug, Default)]
pub struct TooltipStore {
    tips: SecondaryMap<MeshId, String>,
}

impl TooltipStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `text` to every mesh whose name contains `mesh_name`
    /// (case-insensitive), replacing existing tooltips. Returns the number of
    /// meshes matched.
    pub fn attach(&mut self, model: &ModelGraph, mesh_name: &str, text: &str) -> usize {
        let needle = mesh_name.to_lowercase();
        let targets = model.find(|mesh| mesh.name.to_lowercase().contains(&needle));
        for &mesh in &targets {
            self.tips.insert(mesh, text.to_owned());
        }
        targets.len()
    }

    /// Returns the tooltip of a mesh.
    #[must_use]
    pub fn get(&self, mesh: MeshId) -> Option<&str> {
        self.tips.get(mesh).map(String::as_str)
    }

    /// Number of meshes with a tooltip.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tips.len()
    }

    /// Whether no tooltip is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tips.is_empty()
    }

    /// Removes every tooltip.
    pub fn clear(&mut self) {
        self.tips.clear();
    }
}
