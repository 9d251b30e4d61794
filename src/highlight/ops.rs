use serde::{Deserialize, Serialize};

use crate::anatomy::NameSelector;
use crate::scene::{Color, Material, ModelGraph};

use super::{plaque_color, HighlightRegistry, ARTERY_GLOW, VALVE_GLOW};

/// Colors every mesh matching a name selector and records it in the
/// registry.
pub struct Highlight {
    selector: NameSelector,
    material: Material,
}

impl Highlight {
    /// Creates a new `Highlight` operation.
    #[must_use]
    pub fn new(selector: NameSelector, color: Color, emissive_intensity: f64) -> Self {
        Self {
            selector,
            material: Material::glowing(color, emissive_intensity),
        }
    }

    /// Highlights a valve, matched through the valve synonym table.
    #[must_use]
    pub fn valve(name: &str, color: Color) -> Self {
        Self::new(NameSelector::valve(name), color, VALVE_GLOW)
    }

    /// Highlights a coronary artery, matched through the artery synonym table.
    #[must_use]
    pub fn artery(name: &str, color: Color) -> Self {
        Self::new(NameSelector::artery(name), color, ARTERY_GLOW)
    }

    /// Executes the highlight, returning the number of meshes matched.
    ///
    /// Matching nothing is not an error.
    pub fn execute(&self, model: &mut ModelGraph, registry: &mut HighlightRegistry) -> usize {
        let targets = model.find(|mesh| self.selector.matches(&mesh.name));
        for &mesh in &targets {
            registry.apply(model, mesh, self.material);
        }
        tracing::debug!(
            terms = ?self.selector.terms(),
            matched = targets.len(),
            "highlight applied"
        );
        targets.len()
    }
}

/// Plaque description attached to a coronary artery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaqueParams {
    /// Stenosis severity in `[0, 1]`.
    pub severity: f64,
    /// Segment of the artery, e.g. "proximal".
    pub location: String,
    /// Plaque composition, e.g. "calcified".
    #[serde(rename = "type")]
    pub kind: String,
}

impl Default for PlaqueParams {
    fn default() -> Self {
        Self {
            severity: 0.5,
            location: "proximal".to_owned(),
            kind: "calcified".to_owned(),
        }
    }
}

/// Highlights a coronary artery in a color derived from plaque severity.
pub struct PlaqueOverlay<'a> {
    artery: &'a str,
    params: &'a PlaqueParams,
}

impl<'a> PlaqueOverlay<'a> {
    /// Creates a new `PlaqueOverlay` operation.
    #[must_use]
    pub fn new(artery: &'a str, params: &'a PlaqueParams) -> Self {
        Self { artery, params }
    }

    /// Executes the overlay, returning the number of meshes matched.
    pub fn execute(&self, model: &mut ModelGraph, registry: &mut HighlightRegistry) -> usize {
        tracing::info!(
            artery = self.artery,
            severity = self.params.severity,
            location = %self.params.location,
            kind = %self.params.kind,
            "adding plaque overlay"
        );
        Highlight::artery(self.artery, plaque_color(self.params.severity)).execute(model, registry)
    }
}
