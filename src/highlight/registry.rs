use slotmap::SecondaryMap;

use crate::scene::{Color, Material, MeshId, ModelGraph};

/// Record of one highlighted mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightEntry {
    /// The highlighted mesh.
    pub target: MeshId,
    /// Color applied by the highlight.
    pub color: Color,
    /// Emissive intensity applied by the highlight.
    pub emissive_intensity: f64,
    /// Material the mesh had before its first highlight.
    pub original: Material,
}

/// Tracks every mesh whose material was changed by a highlight or overlay.
///
/// Each mesh has at most one entry; highlighting it again replaces the
/// applied color but keeps the original material for restoration.
#[derive(Debug, Default)]
pub struct HighlightRegistry {
    entries: SecondaryMap<MeshId, HighlightEntry>,
}

impl HighlightRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `material` to `mesh` and records the change.
    ///
    /// Returns `false` if the mesh does not exist in the model.
    pub fn apply(&mut self, model: &mut ModelGraph, mesh: MeshId, material: Material) -> bool {
        let Some(data) = model.mesh_mut(mesh) else {
            return false;
        };
        let original = self
            .entries
            .get(mesh)
            .map_or(data.material, |entry| entry.original);
        data.material = material;
        self.entries.insert(
            mesh,
            HighlightEntry {
                target: mesh,
                color: material.color,
                emissive_intensity: material.emissive_intensity,
                original,
            },
        );
        true
    }

    /// Restores every recorded mesh and empties the registry.
    ///
    /// Safe to call on an empty registry.
    pub fn clear_all(&mut self, model: &mut ModelGraph) {
        for (mesh, entry) in self.entries.drain() {
            if let Some(data) = model.mesh_mut(mesh) {
                data.material = entry.original;
            }
        }
    }

    /// Returns the entry for a mesh, if highlighted.
    #[must_use]
    pub fn entry(&self, mesh: MeshId) -> Option<&HighlightEntry> {
        self.entries.get(mesh)
    }

    /// Iterates over all entries.
    pub fn entries(&self) -> impl Iterator<Item = &HighlightEntry> {
        self.entries.values()
    }

    /// Number of highlighted meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is highlighted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::scene::MeshData;

    #[test]
    fn rehighlight_replaces_entry_and_keeps_original() {
        let mut model = ModelGraph::new();
        let mut base = MeshData::new("mitral");
        base.material = Material::glowing(Color(0x12_34_56), 0.1);
        let original = base.material;
        let mesh = model.add_mesh(base);
        let mut registry = HighlightRegistry::new();

        registry.apply(&mut model, mesh, Material::glowing(Color::RED, 0.5));
        registry.apply(&mut model, mesh, Material::glowing(Color::ORANGE, 0.5));

        assert_eq!(registry.len(), 1);
        let entry = registry.entry(mesh).unwrap();
        assert_eq!(entry.color, Color::ORANGE);
        assert_eq!(entry.original, original);
    }

    #[test]
    fn clear_all_restores_and_is_idempotent() {
        let mut model = ModelGraph::new();
        let mesh = model.add_mesh(MeshData::new("aortic"));
        let mut registry = HighlightRegistry::new();
        registry.apply(&mut model, mesh, Material::glowing(Color::RED, 0.5));

        registry.clear_all(&mut model);
        assert!(registry.is_empty());
        assert_eq!(model.mesh(mesh).unwrap().material, Material::default());

        registry.clear_all(&mut model);
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_mesh_is_not_recorded() {
        let mut model = ModelGraph::new();
        let mesh = model.add_mesh(MeshData::new("x"));
        let mut other = ModelGraph::new();
        let mut registry = HighlightRegistry::new();
        // `mesh` belongs to a different graph, whose slot 0 is empty.
        assert!(!registry.apply(&mut other, mesh, Material::default()));
        assert!(registry.is_empty());
    }
}
