use crate::anatomy::{Circulation, Valve};
use crate::cycle::ValveState;
use crate::scene::{MarkerStyle, ObjectId};

/// Which valves must be open for a pool to flow at full speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRule {
    /// Always full speed.
    Ungated,
    /// Full speed only while every listed valve is open.
    AllOpen(&'static [Valve]),
}

impl GateRule {
    /// Gate used by each circulation loop.
    ///
    /// Systemic return gates on the tricuspid valve, pulmonary return must
    /// pass both the mitral and aortic valves, and coronary perfusion is
    /// continuous.
    #[must_use]
    pub fn for_circulation(circulation: Circulation) -> Self {
        match circulation {
            Circulation::Systemic => GateRule::AllOpen(&[Valve::Tricuspid]),
            Circulation::Pulmonary => GateRule::AllOpen(&[Valve::Mitral, Valve::Aortic]),
            Circulation::Coronary => GateRule::Ungated,
        }
    }

    /// Speed multiplier: 1.0 when open, `closed_factor` otherwise.
    #[must_use]
    pub fn factor(&self, valves: &ValveState, closed_factor: f64) -> f64 {
        match self {
            GateRule::Ungated => 1.0,
            GateRule::AllOpen(required) => {
                if required.iter().all(|&v| valves.is_open(v)) {
                    1.0
                } else {
                    closed_factor
                }
            }
        }
    }
}

/// One blood particle travelling along its pool's path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub(super) progress: f64,
    pub(super) speed: f64,
    pub(super) handle: ObjectId,
}

impl Particle {
    /// Position along the path, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Progress gained per frame with open valves.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Scene handle of the particle's marker.
    #[must_use]
    pub fn handle(&self) -> ObjectId {
        self.handle
    }
}

/// The particles of one circulation loop.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    pub(super) circulation: Circulation,
    pub(super) gate: GateRule,
    pub(super) style: MarkerStyle,
    pub(super) capacity: usize,
    pub(super) particles: Vec<Particle>,
}

impl ParticlePool {
    pub(super) fn new(circulation: Circulation, style: MarkerStyle, capacity: usize) -> Self {
        Self {
            circulation,
            gate: GateRule::for_circulation(circulation),
            style,
            capacity,
            particles: Vec::with_capacity(capacity),
        }
    }

    /// The circulation loop this pool belongs to.
    #[must_use]
    pub fn circulation(&self) -> Circulation {
        self.circulation
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the pool holds no particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Read-only view of the particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

/// Wraps progress that has run past the end of the path back into `[0, 1)`.
#[must_use]
pub fn wrap_progress(progress: f64) -> f64 {
    if progress > 1.0 {
        progress.fract()
    } else {
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::PhaseKind;

    #[test]
    fn wrapped_progress_stays_in_unit_interval() {
        for overshoot in [1e-12, 0.001, 0.5, 0.999_999, 1.0, 3.25] {
            let wrapped = wrap_progress(1.0 + overshoot);
            assert!((0.0..1.0).contains(&wrapped), "{overshoot} -> {wrapped}");
        }
        assert!((wrap_progress(1.0) - 1.0).abs() < f64::EPSILON);
        assert!((wrap_progress(0.4) - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn systemic_gate_follows_tricuspid() {
        let gate = GateRule::for_circulation(Circulation::Systemic);
        let filling = ValveState::for_phase(PhaseKind::DiastoleFill);
        let ejecting = ValveState::for_phase(PhaseKind::VentricularSystole);
        assert!((gate.factor(&filling, 0.3) - 1.0).abs() < f64::EPSILON);
        assert!((gate.factor(&ejecting, 0.3) - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn pulmonary_gate_needs_mitral_and_aortic() {
        let gate = GateRule::for_circulation(Circulation::Pulmonary);
        let both = ValveState {
            tricuspid: false,
            pulmonic: false,
            mitral: true,
            aortic: true,
        };
        let mitral_only = ValveState {
            aortic: false,
            ..both
        };
        assert!((gate.factor(&both, 0.3) - 1.0).abs() < f64::EPSILON);
        assert!((gate.factor(&mitral_only, 0.3) - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn coronary_flow_is_never_gated() {
        let gate = GateRule::for_circulation(Circulation::Coronary);
        let ejecting = ValveState::for_phase(PhaseKind::VentricularSystole);
        assert!((gate.factor(&ejecting, 0.3) - 1.0).abs() < f64::EPSILON);
    }
}
