//! Cardiac cycle clock.
//!
//! A single phase accumulator loops over a fixed-duration beat. Each tick
//! recomputes the contraction scale and the valve states from the phase
//! fraction alone, so readers never see hysteresis or stale valve state.

mod phase;

pub use phase::{CardiacPhase, PhaseKind, ValveState};

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Timing and amplitude of the beat.
///
/// Boundaries are fractions of `duration`: diastolic fill runs
/// `[0, fill_end)`, atrial systole `[fill_end, atrial_end)`, ventricular
/// systole `[atrial_end, ventricular_end)`, and relaxation the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// Length of one beat in seconds (0.8 s is 75 beats per minute).
    pub duration: f64,
    pub fill_end: f64,
    pub atrial_end: f64,
    pub ventricular_end: f64,
    /// Peak swell above rest during passive filling.
    pub fill_amplitude: f64,
    /// Peak swell above rest during the atrial kick.
    pub atrial_amplitude: f64,
    /// Peak shrink below rest at end of ejection.
    pub ventricular_amplitude: f64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            duration: 0.8,
            fill_end: 0.05,
            atrial_end: 0.125,
            ventricular_end: 0.5,
            fill_amplitude: 0.01,
            atrial_amplitude: 0.03,
            ventricular_amplitude: 0.08,
        }
    }
}

impl CycleConfig {
    /// Checks that the duration is positive and the boundaries are ordered.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cycle duration must be positive, got {}",
                self.duration
            )));
        }
        let ordered = 0.0 < self.fill_end
            && self.fill_end < self.atrial_end
            && self.atrial_end < self.ventricular_end
            && self.ventricular_end < 1.0;
        if !ordered {
            return Err(ConfigError::Invalid(format!(
                "cycle boundaries must satisfy 0 < {} < {} < {} < 1",
                self.fill_end, self.atrial_end, self.ventricular_end
            )));
        }
        Ok(())
    }

    /// Classifies a phase fraction and returns the fraction's position
    /// within that sub-phase.
    #[must_use]
    pub fn classify(&self, fraction: f64) -> (PhaseKind, f64) {
        let local = |start: f64, end: f64| (fraction - start) / (end - start);
        if fraction < self.fill_end {
            (PhaseKind::DiastoleFill, local(0.0, self.fill_end))
        } else if fraction < self.atrial_end {
            (PhaseKind::AtrialSystole, local(self.fill_end, self.atrial_end))
        } else if fraction < self.ventricular_end {
            (
                PhaseKind::VentricularSystole,
                local(self.atrial_end, self.ventricular_end),
            )
        } else {
            (PhaseKind::DiastoleRelax, local(self.ventricular_end, 1.0))
        }
    }

    /// Computes the full phase snapshot for a fraction in `[0, 1)`.
    #[must_use]
    pub fn phase_at(&self, fraction: f64) -> CardiacPhase {
        let (kind, local) = self.classify(fraction);
        let ventricular_scale = match kind {
            PhaseKind::DiastoleFill => 1.0 + self.fill_amplitude * (PI * local).sin(),
            PhaseKind::AtrialSystole => 1.0 + self.atrial_amplitude * (PI * local).sin(),
            // The dip bottoms out at end of ejection; relaxation returns it.
            PhaseKind::VentricularSystole => {
                1.0 - self.ventricular_amplitude * (FRAC_PI_2 * local).sin()
            }
            PhaseKind::DiastoleRelax => {
                1.0 - self.ventricular_amplitude * (1.0 - smoothstep(local))
            }
        };
        CardiacPhase {
            fraction,
            kind,
            ventricular_scale,
            valves: ValveState::for_phase(kind),
        }
    }
}

fn smoothstep(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Continuously looping beat clock.
///
/// Disabled clocks ignore ticks and keep reporting the last computed phase.
#[derive(Debug, Clone)]
pub struct CardiacClock {
    config: CycleConfig,
    elapsed: f64,
    enabled: bool,
    phase: CardiacPhase,
}

impl CardiacClock {
    /// Creates a disabled clock at the start of the cycle.
    #[must_use]
    pub fn new(config: CycleConfig) -> Self {
        Self {
            phase: config.phase_at(0.0),
            config,
            elapsed: 0.0,
            enabled: false,
        }
    }

    /// Rewinds to the start of the cycle and starts advancing.
    pub fn enable(&mut self) {
        self.elapsed = 0.0;
        self.enabled = true;
        self.phase = self.config.phase_at(0.0);
        tracing::debug!("cardiac clock enabled");
    }

    /// Freezes the clock at its current phase.
    pub fn disable(&mut self) {
        self.enabled = false;
        tracing::debug!(fraction = self.phase.fraction, "cardiac clock disabled");
    }

    /// Whether ticks currently advance the clock.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Advances by `delta` seconds, wrapping at the cycle duration.
    ///
    /// Non-positive or non-finite deltas, and ticks while disabled, are
    /// ignored.
    pub fn tick(&mut self, delta: f64) {
        if !self.enabled || !delta.is_finite() || delta <= 0.0 {
            return;
        }
        let duration = self.config.duration;
        self.elapsed = (self.elapsed + delta).rem_euclid(duration);
        let fraction = (self.elapsed / duration).min(1.0 - f64::EPSILON);
        self.phase = self.config.phase_at(fraction);
    }

    /// Returns the most recently computed phase.
    #[must_use]
    pub fn phase(&self) -> &CardiacPhase {
        &self.phase
    }

    /// Returns the clock configuration.
    #[must_use]
    pub fn config(&self) -> &CycleConfig {
        &self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use approx::assert_abs_diff_eq;

    use super::*;

    fn running_clock() -> CardiacClock {
        let mut clock = CardiacClock::new(CycleConfig::default());
        clock.enable();
        clock
    }

    #[test]
    fn default_config_is_valid() {
        CycleConfig::default().validate().unwrap();
    }

    #[test]
    fn misordered_boundaries_are_rejected() {
        let config = CycleConfig {
            atrial_end: 0.6,
            ..CycleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_duration_is_rejected() {
        let config = CycleConfig {
            duration: 0.0,
            ..CycleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn one_cycle_visits_every_phase_and_returns_to_start() {
        let mut clock = running_clock();
        let start = clock.phase().ventricular_scale;
        let mut seen = HashSet::new();
        let dt = 0.001;
        for _ in 0..800 {
            clock.tick(dt);
            seen.insert(clock.phase().kind);
        }
        assert_eq!(seen.len(), 4);
        assert_abs_diff_eq!(clock.phase().ventricular_scale, start, epsilon = 1e-3);
    }

    #[test]
    fn ventricular_dip_is_the_largest_excursion() {
        let config = CycleConfig::default();
        let mut lowest = f64::MAX;
        let mut highest = f64::MIN;
        for i in 0..1000 {
            let scale = config.phase_at(f64::from(i) / 1000.0).ventricular_scale;
            lowest = lowest.min(scale);
            highest = highest.max(scale);
        }
        assert!(1.0 - lowest > highest - 1.0);
        assert_abs_diff_eq!(lowest, 1.0 - config.ventricular_amplitude, epsilon = 1e-3);
    }

    #[test]
    fn valves_alternate_at_every_instant() {
        let config = CycleConfig::default();
        for i in 0..1000 {
            let valves = config.phase_at(f64::from(i) / 1000.0).valves;
            assert_ne!(valves.tricuspid, valves.pulmonic);
            assert_ne!(valves.mitral, valves.aortic);
        }
    }

    #[test]
    fn semilunar_valves_open_only_in_ventricular_systole() {
        let config = CycleConfig::default();
        let systole = config.phase_at(0.3);
        assert_eq!(systole.kind, PhaseKind::VentricularSystole);
        assert!(systole.valves.aortic && systole.valves.pulmonic);
        let fill = config.phase_at(0.01);
        assert!(fill.valves.mitral && fill.valves.tricuspid);
        assert!(!fill.valves.aortic);
    }

    #[test]
    fn disabled_clock_freezes() {
        let mut clock = running_clock();
        clock.tick(0.3);
        let frozen = *clock.phase();
        clock.disable();
        clock.tick(0.2);
        assert_eq!(*clock.phase(), frozen);
    }

    #[test]
    fn enable_resets_to_cycle_start() {
        let mut clock = running_clock();
        clock.tick(0.3);
        clock.disable();
        clock.enable();
        assert_abs_diff_eq!(clock.phase().fraction, 0.0);
        assert_eq!(clock.phase().kind, PhaseKind::DiastoleFill);
    }

    #[test]
    fn non_positive_delta_is_ignored() {
        let mut clock = running_clock();
        clock.tick(0.1);
        let before = *clock.phase();
        clock.tick(0.0);
        clock.tick(-1.0);
        clock.tick(f64::NAN);
        assert_eq!(*clock.phase(), before);
    }

    #[test]
    fn elapsed_wraps_past_duration() {
        let mut clock = running_clock();
        clock.tick(0.9);
        assert_abs_diff_eq!(clock.phase().fraction, 0.125, epsilon = 1e-9);
    }
}
