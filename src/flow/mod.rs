//! Blood-flow particle system.
//!
//! Three pools (systemic, pulmonary, coronary) of particles are advected
//! along their circulation paths. Pools are built as a batch when flow is
//! enabled and torn down as a batch when it is disabled; in between only
//! particle progress changes.

mod pool;

pub use pool::{wrap_progress, GateRule, Particle, ParticlePool};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Deserializer, Serialize};

use crate::anatomy::{Circulation, PathCatalog};
use crate::cycle::ValveState;
use crate::error::ConfigError;
use crate::geometry::Curve;
use crate::scene::{Color, MarkerStyle, Scene};

/// Size and pace of one pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of particles created when flow is enabled.
    pub count: usize,
    /// Mean progress gained per frame with open valves.
    pub base_speed: f64,
    /// Marker color.
    pub color: Color,
}

/// Pool settings as written in a config file. Absent fields keep the
/// defaults of the pool's own circulation.
#[derive(Deserialize)]
struct PoolOverrides {
    count: Option<usize>,
    base_speed: Option<f64>,
    color: Option<Color>,
}

fn pool_with_defaults<'de, D: Deserializer<'de>>(
    deserializer: D,
    circulation: Circulation,
) -> Result<PoolConfig, D::Error> {
    let overrides = PoolOverrides::deserialize(deserializer)?;
    let base = *FlowConfig::default().pool(circulation);
    Ok(PoolConfig {
        count: overrides.count.unwrap_or(base.count),
        base_speed: overrides.base_speed.unwrap_or(base.base_speed),
        color: overrides.color.unwrap_or(base.color),
    })
}

fn systemic_pool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PoolConfig, D::Error> {
    pool_with_defaults(deserializer, Circulation::Systemic)
}

fn pulmonary_pool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PoolConfig, D::Error> {
    pool_with_defaults(deserializer, Circulation::Pulmonary)
}

fn coronary_pool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PoolConfig, D::Error> {
    pool_with_defaults(deserializer, Circulation::Coronary)
}

/// Blood-flow tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    #[serde(deserialize_with = "systemic_pool")]
    pub systemic: PoolConfig,
    #[serde(deserialize_with = "pulmonary_pool")]
    pub pulmonary: PoolConfig,
    #[serde(deserialize_with = "coronary_pool")]
    pub coronary: PoolConfig,
    /// Per-particle speed spread as a fraction of the base speed.
    pub jitter: f64,
    /// Speed multiplier while a pool's gating valves are closed.
    pub closed_gate_factor: f64,
    pub marker_radius: f64,
    /// Fixed seed for reproducible jitter; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            systemic: PoolConfig {
                count: 80,
                base_speed: 0.004,
                color: Color(0x33_66_ff),
            },
            pulmonary: PoolConfig {
                count: 100,
                base_speed: 0.006,
                color: Color(0xff_33_33),
            },
            coronary: PoolConfig {
                count: 60,
                base_speed: 0.002,
                color: Color(0xff_99_00),
            },
            jitter: 0.25,
            closed_gate_factor: 0.3,
            marker_radius: 0.02,
            seed: None,
        }
    }
}

impl FlowConfig {
    /// Returns the settings of one pool.
    #[must_use]
    pub fn pool(&self, circulation: Circulation) -> &PoolConfig {
        match circulation {
            Circulation::Systemic => &self.systemic,
            Circulation::Pulmonary => &self.pulmonary,
            Circulation::Coronary => &self.coronary,
        }
    }

    /// Checks speeds, jitter and gate factor.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for circulation in Circulation::ALL {
            let speed = self.pool(circulation).base_speed;
            if !(speed.is_finite() && speed > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} base speed must be positive, got {speed}",
                    circulation.name()
                )));
            }
        }
        if !(0.0..1.0).contains(&self.jitter) {
            return Err(ConfigError::Invalid(format!(
                "jitter must lie in [0, 1), got {}",
                self.jitter
            )));
        }
        if !(0.0..=1.0).contains(&self.closed_gate_factor) {
            return Err(ConfigError::Invalid(format!(
                "closed gate factor must lie in [0, 1], got {}",
                self.closed_gate_factor
            )));
        }
        Ok(())
    }
}

/// The three particle pools and the paths they follow.
#[derive(Debug)]
pub struct BloodFlow {
    config: FlowConfig,
    paths: PathCatalog,
    pools: Vec<ParticlePool>,
    rng: StdRng,
    enabled: bool,
    restrictions: Vec<serde_json::Value>,
}

impl BloodFlow {
    /// Creates a disabled system with empty pools.
    #[must_use]
    pub fn new(config: FlowConfig, paths: PathCatalog) -> Self {
        let style = |c: Circulation| MarkerStyle {
            color: config.pool(c).color,
            radius: config.marker_radius,
        };
        let pools = Circulation::ALL
            .iter()
            .map(|&c| ParticlePool::new(c, style(c), config.pool(c).count))
            .collect();
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            config,
            paths,
            pools,
            rng,
            enabled: false,
            restrictions: Vec::new(),
        }
    }

    /// Whether particles are live and advancing.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Populates every empty pool and starts advancing.
    pub fn enable<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        for pool in &mut self.pools {
            if !pool.is_empty() {
                continue;
            }
            let path = self.paths.path(pool.circulation);
            let base = self.config.pool(pool.circulation).base_speed;
            #[allow(clippy::cast_precision_loss)]
            let spacing = 1.0 / pool.capacity.max(1) as f64;
            for i in 0..pool.capacity {
                #[allow(clippy::cast_precision_loss)]
                let progress = i as f64 * spacing;
                let jitter = self.rng.gen_range(-self.config.jitter..=self.config.jitter);
                let handle = scene.add_marker(pool.style, path.evaluate(progress));
                pool.particles.push(Particle {
                    progress,
                    speed: base * (1.0 + jitter),
                    handle,
                });
            }
            tracing::debug!(
                circulation = pool.circulation.name(),
                count = pool.len(),
                "particle pool created"
            );
        }
        self.enabled = true;
    }

    /// Removes every particle from the scene and empties the pools.
    pub fn disable<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        let mut removed = 0;
        for pool in &mut self.pools {
            for particle in pool.particles.drain(..) {
                scene.remove_marker(particle.handle);
                removed += 1;
            }
        }
        if self.enabled || removed > 0 {
            tracing::debug!(removed, "blood flow disabled");
        }
        self.enabled = false;
    }

    /// Advances every particle by one frame and moves its marker.
    pub fn tick<S: Scene + ?Sized>(&mut self, valves: &ValveState, scene: &mut S) {
        if !self.enabled {
            return;
        }
        for pool in &mut self.pools {
            let gate = pool.gate.factor(valves, self.config.closed_gate_factor);
            let path = self.paths.path(pool.circulation);
            for particle in &mut pool.particles {
                particle.progress = wrap_progress(particle.progress + particle.speed * gate);
                scene.set_marker_position(particle.handle, path.evaluate(particle.progress));
            }
        }
    }

    /// Returns the pool of one circulation loop.
    #[must_use]
    pub fn pool(&self, circulation: Circulation) -> &ParticlePool {
        // Pools are built in `Circulation::ALL` order.
        let index = Circulation::ALL
            .iter()
            .position(|&c| c == circulation)
            .unwrap_or_default();
        &self.pools[index]
    }

    /// Total live particles across all pools.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.pools.iter().map(ParticlePool::len).sum()
    }

    /// Returns the path catalog.
    #[must_use]
    pub fn paths(&self) -> &PathCatalog {
        &self.paths
    }

    /// Records a region of restricted flow.
    ///
    /// Regions are kept for the host to inspect; they do not yet slow the
    /// particles passing through them.
    pub fn restrict(&mut self, region: serde_json::Value) {
        tracing::info!(%region, "restricting blood flow in region");
        self.restrictions.push(region);
    }

    /// Returns the recorded restriction regions.
    #[must_use]
    pub fn restrictions(&self) -> &[serde_json::Value] {
        &self.restrictions
    }

    /// Forgets all restriction regions.
    pub fn clear_restrictions(&mut self) {
        self.restrictions.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cycle::PhaseKind;
    use crate::scene::HeadlessScene;

    fn seeded() -> BloodFlow {
        let config = FlowConfig {
            seed: Some(7),
            ..FlowConfig::default()
        };
        BloodFlow::new(config, PathCatalog::anatomical().unwrap())
    }

    fn open_av() -> ValveState {
        ValveState::for_phase(PhaseKind::DiastoleFill)
    }

    #[test]
    fn default_config_is_valid() {
        FlowConfig::default().validate().unwrap();
    }

    #[test]
    fn jitter_of_one_is_rejected() {
        let config = FlowConfig {
            jitter: 1.0,
            ..FlowConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn enable_builds_every_pool() {
        let mut flow = seeded();
        let mut scene = HeadlessScene::new();
        flow.enable(&mut scene);

        assert_eq!(flow.pool(Circulation::Systemic).len(), 80);
        assert_eq!(flow.pool(Circulation::Pulmonary).len(), 100);
        assert_eq!(flow.pool(Circulation::Coronary).len(), 60);
        assert_eq!(scene.marker_count(), 240);
    }

    #[test]
    fn initial_progress_is_staggered() {
        let mut flow = seeded();
        let mut scene = HeadlessScene::new();
        flow.enable(&mut scene);

        let pool = flow.pool(Circulation::Coronary);
        let progress: Vec<f64> = pool.particles().iter().map(Particle::progress).collect();
        assert!(progress.windows(2).all(|w| w[1] > w[0]));
        assert!(progress.iter().all(|p| (0.0..1.0).contains(p)));
    }

    #[test]
    fn speeds_stay_within_jitter_band() {
        let mut flow = seeded();
        let mut scene = HeadlessScene::new();
        flow.enable(&mut scene);

        for circulation in Circulation::ALL {
            let base = FlowConfig::default().pool(circulation).base_speed;
            for particle in flow.pool(circulation).particles() {
                assert!(particle.speed() >= base * 0.75 - 1e-12);
                assert!(particle.speed() <= base * 1.25 + 1e-12);
            }
        }
    }

    #[test]
    fn enabling_twice_does_not_duplicate() {
        let mut flow = seeded();
        let mut scene = HeadlessScene::new();
        flow.enable(&mut scene);
        flow.enable(&mut scene);
        assert_eq!(flow.particle_count(), 240);
        assert_eq!(scene.marker_count(), 240);
    }

    #[test]
    fn disable_removes_everything_and_is_idempotent() {
        let mut flow = seeded();
        let mut scene = HeadlessScene::new();
        flow.enable(&mut scene);
        flow.disable(&mut scene);
        assert_eq!(flow.particle_count(), 0);
        assert_eq!(scene.marker_count(), 0);
        flow.disable(&mut scene);
        assert!(!flow.is_enabled());
    }

    #[test]
    fn tick_moves_markers_along_paths() {
        let mut flow = seeded();
        let mut scene = HeadlessScene::new();
        flow.enable(&mut scene);
        flow.tick(&open_av(), &mut scene);

        let pool = flow.pool(Circulation::Systemic);
        let path = flow.paths().path(Circulation::Systemic);
        for particle in pool.particles() {
            let marker = scene.marker(particle.handle()).unwrap();
            assert_eq!(marker.position, path.evaluate(particle.progress()));
        }
    }

    #[test]
    fn closed_valves_slow_gated_pools() {
        let mut open = seeded();
        let mut closed = seeded();
        let mut scene = HeadlessScene::new();
        open.enable(&mut scene);
        closed.enable(&mut scene);

        open.tick(&open_av(), &mut scene);
        closed.tick(&ValveState::for_phase(PhaseKind::VentricularSystole), &mut scene);

        let first = |flow: &BloodFlow, c| flow.pool(c).particles()[1].progress();
        let start = 1.0 / 80.0;
        let open_step = first(&open, Circulation::Systemic) - start;
        let closed_step = first(&closed, Circulation::Systemic) - start;
        assert!((closed_step - open_step * 0.3).abs() < 1e-12);
    }

    #[test]
    fn tick_is_ignored_while_disabled() {
        let mut flow = seeded();
        let mut scene = HeadlessScene::new();
        flow.tick(&open_av(), &mut scene);
        assert_eq!(flow.particle_count(), 0);
    }

    #[test]
    fn particles_loop_back_to_the_start() {
        let mut flow = seeded();
        let mut scene = HeadlessScene::new();
        flow.enable(&mut scene);
        for _ in 0..2000 {
            flow.tick(&open_av(), &mut scene);
        }
        for circulation in Circulation::ALL {
            for particle in flow.pool(circulation).particles() {
                assert!((0.0..=1.0).contains(&particle.progress()));
            }
        }
    }

    #[test]
    fn restrictions_are_recorded() {
        let mut flow = seeded();
        flow.restrict(serde_json::json!({ "min": [0, 0, 0], "max": [1, 1, 1] }));
        assert_eq!(flow.restrictions().len(), 1);
        flow.clear_restrictions();
        assert!(flow.restrictions().is_empty());
    }
}
