use crate::anatomy::Valve;

/// Sub-phase of the cardiac cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Passive ventricular filling.
    DiastoleFill,
    /// Atrial contraction topping up the ventricles.
    AtrialSystole,
    /// Ventricular contraction and ejection.
    VentricularSystole,
    /// Ventricular relaxation back to rest volume.
    DiastoleRelax,
}

/// Open/closed state of the four valves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ValveState {
    pub tricuspid: bool,
    pub pulmonic: bool,
    pub mitral: bool,
    pub aortic: bool,
}

impl ValveState {
    /// Valve state for a phase. Atrioventricular valves are open outside
    /// ventricular systole; semilunar valves only during it.
    #[must_use]
    pub fn for_phase(kind: PhaseKind) -> Self {
        let ejecting = kind == PhaseKind::VentricularSystole;
        Self {
            tricuspid: !ejecting,
            pulmonic: ejecting,
            mitral: !ejecting,
            aortic: ejecting,
        }
    }

    /// Whether the given valve is open.
    #[must_use]
    pub fn is_open(&self, valve: Valve) -> bool {
        match valve {
            Valve::Tricuspid => self.tricuspid,
            Valve::Pulmonic => self.pulmonic,
            Valve::Mitral => self.mitral,
            Valve::Aortic => self.aortic,
        }
    }
}

/// Snapshot of the cycle, recomputed on every clock tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardiacPhase {
    /// Position within the cycle, in `[0, 1)`.
    pub fraction: f64,
    /// Current sub-phase.
    pub kind: PhaseKind,
    /// Uniform scale applied to the organ; 1.0 is rest.
    pub ventricular_scale: f64,
    /// Valve gating derived from `kind`.
    pub valves: ValveState,
}
