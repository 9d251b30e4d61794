//! Highlight and overlay bookkeeping.
//!
//! Every material change made on behalf of a highlight goes through the
//! [`HighlightRegistry`], so one call to [`HighlightRegistry::clear_all`]
//! undoes all of them.

mod ops;
mod registry;
mod severity;
mod tooltips;

pub use ops::{Highlight, PlaqueOverlay, PlaqueParams};
pub use registry::{HighlightEntry, HighlightRegistry};
pub use severity::{organ_risk_material, plaque_color, valve_disease_color};
pub use tooltips::TooltipStore;

/// Emissive boost for valve highlights.
pub const VALVE_GLOW: f64 = 0.5;

/// Emissive boost for coronary artery highlights.
pub const ARTERY_GLOW: f64 = 0.6;
