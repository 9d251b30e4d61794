use crate::error::Result;
use crate::geometry::CatmullRom;
use crate::math::Point3;

use super::Circulation;

/// Vena cava through the right heart into the pulmonary artery.
const SYSTEMIC_WAYPOINTS: [[f64; 3]; 10] = [
    [-0.60, 1.60, 0.10],  // superior vena cava
    [-0.60, 0.90, 0.10],  // caval junction
    [-0.55, 0.45, 0.15],  // right atrium
    [-0.35, 0.05, 0.25],  // tricuspid valve
    [-0.20, -0.50, 0.35], // right ventricle
    [0.00, -0.85, 0.30],  // right ventricular apex
    [0.10, -0.20, 0.45],  // right ventricular outflow tract
    [0.15, 0.45, 0.40],   // pulmonic valve
    [0.10, 0.95, 0.30],   // pulmonary trunk
    [0.55, 1.15, 0.00],   // left pulmonary artery
];

/// Pulmonary veins through the left heart into the aorta.
const PULMONARY_WAYPOINTS: [[f64; 3]; 10] = [
    [0.75, 0.70, -0.45],  // pulmonary veins
    [0.45, 0.50, -0.35],  // left atrium
    [0.35, 0.05, -0.15],  // mitral valve
    [0.30, -0.50, -0.05], // left ventricle
    [0.15, -1.00, 0.05],  // left ventricular apex
    [0.05, -0.25, -0.05], // left ventricular outflow tract
    [-0.05, 0.35, 0.00],  // aortic valve
    [-0.10, 1.00, 0.05],  // ascending aorta
    [0.15, 1.45, -0.10],  // aortic arch
    [0.45, 1.10, -0.45],  // descending aorta
];

/// Aortic root around the epicardial arteries back to the right atrium.
const CORONARY_WAYPOINTS: [[f64; 3]; 10] = [
    [-0.05, 0.40, 0.05],  // aortic root
    [0.20, 0.45, 0.35],   // left main
    [0.25, 0.10, 0.55],   // proximal LAD
    [0.20, -0.40, 0.60],  // mid LAD
    [0.05, -0.95, 0.40],  // apex
    [-0.20, -0.60, -0.40], // posterior descending
    [-0.50, -0.10, -0.10], // distal RCA
    [-0.45, 0.25, 0.35],  // proximal RCA
    [-0.35, 0.20, -0.30], // coronary sinus
    [-0.50, 0.40, 0.00],  // right atrium
];

fn build(waypoints: &[[f64; 3]]) -> Result<CatmullRom> {
    CatmullRom::new(
        waypoints
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect(),
    )
}

/// The flow path of each circulation loop.
#[derive(Debug, Clone)]
pub struct PathCatalog {
    systemic: CatmullRom,
    pulmonary: CatmullRom,
    coronary: CatmullRom,
}

impl PathCatalog {
    /// Creates a catalog from explicit paths.
    #[must_use]
    pub fn new(systemic: CatmullRom, pulmonary: CatmullRom, coronary: CatmullRom) -> Self {
        Self {
            systemic,
            pulmonary,
            coronary,
        }
    }

    /// Builds the catalog from the built-in anatomical waypoints.
    ///
    /// # Errors
    ///
    /// Returns an error if a waypoint table is invalid.
    pub fn anatomical() -> Result<Self> {
        Ok(Self::new(
            build(&SYSTEMIC_WAYPOINTS)?,
            build(&PULMONARY_WAYPOINTS)?,
            build(&CORONARY_WAYPOINTS)?,
        ))
    }

    /// Returns the path for a circulation loop.
    #[must_use]
    pub fn path(&self, circulation: Circulation) -> &CatmullRom {
        match circulation {
            Circulation::Systemic => &self.systemic,
            Circulation::Pulmonary => &self.pulmonary,
            Circulation::Coronary => &self.coronary,
        }
    }
}
