//! Anatomical reference data: the circulation loops particles travel along,
//! the four valves, and the name tables used to find structures in a model.

mod paths;
mod synonyms;

pub use paths::PathCatalog;
pub use synonyms::{NameSelector, ARTERY_SYNONYMS, VALVE_SYNONYMS};

use serde::{Deserialize, Serialize};

/// One of the three simulated blood-flow circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Circulation {
    /// Deoxygenated return through the right heart.
    Systemic,
    /// Oxygenated return through the left heart.
    Pulmonary,
    /// Myocardial perfusion over the heart surface.
    Coronary,
}

impl Circulation {
    /// All circuits in pool order.
    pub const ALL: [Circulation; 3] = [
        Circulation::Systemic,
        Circulation::Pulmonary,
        Circulation::Coronary,
    ];

    /// Returns the lowercase circuit name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Circulation::Systemic => "systemic",
            Circulation::Pulmonary => "pulmonary",
            Circulation::Coronary => "coronary",
        }
    }
}

/// A heart valve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Valve {
    /// Right atrioventricular valve.
    Tricuspid,
    /// Right ventricular outflow valve.
    Pulmonic,
    /// Left atrioventricular valve.
    Mitral,
    /// Left ventricular outflow valve.
    Aortic,
}
