//! The viewer facade.
//!
//! [`Viewer`] owns the scene, camera, model, cardiac clock, particle pools,
//! highlight registry and tooltip store. The host calls [`Viewer::frame`]
//! once per display refresh and the mutation methods from its UI handlers,
//! all on one thread.

mod config;

pub use config::ViewerConfig;

use crate::anatomy::PathCatalog;
use crate::cycle::CardiacClock;
use crate::diagnosis::{DiagnosisDescription, DiagnosisOutcome, RenderDiagnosis};
use crate::error::{LoadError, Result, ViewerError};
use crate::flow::BloodFlow;
use crate::highlight::{Highlight, HighlightRegistry, PlaqueOverlay, PlaqueParams, TooltipStore};
use crate::math::{organ_transform, Point3};
use crate::scene::{Camera, Color, MeshId, ModelGraph, ModelLoader, Scene, ViewMode};

/// Interactive heart viewer bound to one scene.
///
/// Mutation methods fail with [`ViewerError::ModelNotLoaded`] until
/// [`Viewer::load_model`] succeeds and with [`ViewerError::Disposed`] after
/// [`Viewer::dispose`]; a failed call changes nothing.
#[derive(Debug)]
pub struct Viewer<S: Scene> {
    config: ViewerConfig,
    scene: S,
    camera: Camera,
    model: Option<ModelGraph>,
    center: Point3,
    clock: CardiacClock,
    flow: BloodFlow,
    highlights: HighlightRegistry,
    tooltips: TooltipStore,
    auto_rotate: bool,
    yaw: f64,
    last_frame: Option<f64>,
    running: bool,
    disposed: bool,
}

impl<S: Scene> Viewer<S> {
    /// Creates a viewer with no model. The scene background and lights are
    /// installed immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn new(mut scene: S, config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        scene.set_background(config.background);
        scene.set_lighting(&config.lighting());
        Ok(Self {
            camera: config.camera(),
            clock: CardiacClock::new(config.cycle),
            flow: BloodFlow::new(config.flow, PathCatalog::anatomical()?),
            config,
            scene,
            model: None,
            center: Point3::origin(),
            highlights: HighlightRegistry::new(),
            tooltips: TooltipStore::new(),
            auto_rotate: false,
            yaw: 0.0,
            last_frame: None,
            running: false,
            disposed: false,
        })
    }

    /// Creates a viewer and loads its model in one step. No viewer exists if
    /// loading fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the model fails to load.
    pub fn open<L: ModelLoader>(scene: S, config: ViewerConfig, loader: &mut L) -> Result<Self> {
        let mut viewer = Self::new(scene, config)?;
        viewer.load_model(loader)?;
        Ok(viewer)
    }

    /// Loads the heart model from the configured source, centers it, and
    /// starts the render loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the viewer is disposed, the loader fails, or the
    /// model is empty. The viewer stays unloaded in that case.
    pub fn load_model<L: ModelLoader>(&mut self, loader: &mut L) -> Result<()> {
        if self.disposed {
            return Err(ViewerError::Disposed.into());
        }
        let source = self.config.model_source.clone();
        let model = loader.load(&source).inspect_err(|e| {
            tracing::error!(error = %e, "error loading heart model");
        })?;
        if model.is_empty() {
            return Err(LoadError::EmptyModel(source).into());
        }

        if let Some(previous) = self.model.as_mut() {
            self.highlights.clear_all(previous);
        }
        self.tooltips.clear();
        self.center = model.bounding_box().map_or_else(Point3::origin, |b| b.center());
        tracing::info!(%source, meshes = model.len(), "heart model loaded");
        self.model = Some(model);
        self.running = true;
        self.last_frame = None;
        Ok(())
    }

    /// Advances the animation to `now` (seconds on any monotonic clock) and
    /// renders one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn frame(&mut self, now: f64) -> Result<()> {
        let model = Self::ready_model(&mut self.model, self.disposed, "frame")?;
        let delta = self.last_frame.map_or(0.0, |last| (now - last).max(0.0));
        self.last_frame = Some(now);

        // A disabled clock ignores ticks, so the organ holds its frozen scale.
        self.clock.tick(delta);
        let scale = self.clock.phase().ventricular_scale;
        self.flow.tick(&self.clock.phase().valves, &mut self.scene);
        if self.auto_rotate {
            self.yaw = (self.yaw + self.config.auto_rotate_speed) % std::f64::consts::TAU;
        }
        model.set_root_transform(organ_transform(&self.center, scale, self.yaw));
        self.scene.render(&self.camera, model);
        Ok(())
    }

    /// Updates the camera for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Turns constant-rate spinning of the organ on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn set_auto_rotate(&mut self, enabled: bool) -> Result<()> {
        Self::ready_model(&mut self.model, self.disposed, "set_auto_rotate")?;
        self.auto_rotate = enabled;
        Ok(())
    }

    /// Creates or removes the blood-flow particles.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn set_blood_flow(&mut self, enabled: bool) -> Result<()> {
        Self::ready_model(&mut self.model, self.disposed, "set_blood_flow")?;
        if enabled {
            self.flow.enable(&mut self.scene);
        } else {
            self.flow.disable(&mut self.scene);
        }
        Ok(())
    }

    /// Starts the heartbeat from the beginning of a cycle, or freezes it.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn set_heart_beat(&mut self, enabled: bool) -> Result<()> {
        Self::ready_model(&mut self.model, self.disposed, "set_heart_beat")?;
        if enabled {
            self.clock.enable();
        } else {
            self.clock.disable();
        }
        Ok(())
    }

    /// Shows the organ from outside or cut away.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn set_view(&mut self, mode: ViewMode) -> Result<()> {
        let model = Self::ready_model(&mut self.model, self.disposed, "set_view")?;
        model.apply_view(mode);
        Ok(())
    }

    /// Maps a diagnosis onto the model, replacing all prior highlights.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn render_diagnosis(
        &mut self,
        diagnosis: &DiagnosisDescription,
    ) -> Result<DiagnosisOutcome> {
        let model = Self::ready_model(&mut self.model, self.disposed, "render_diagnosis")?;
        Ok(RenderDiagnosis::new(diagnosis).execute(
            model,
            &mut self.highlights,
            &mut self.tooltips,
            &mut self.flow,
        ))
    }

    /// Parses a diagnosis from its JSON wire form and renders it.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded, the viewer is disposed, the
    /// input is `null`, or the JSON is malformed.
    pub fn render_diagnosis_json(&mut self, json: &str) -> Result<DiagnosisOutcome> {
        Self::ready_model(&mut self.model, self.disposed, "render_diagnosis")?;
        let diagnosis = DiagnosisDescription::from_json(json)
            .map_err(ViewerError::from)
            .inspect_err(|e| tracing::warn!(error = %e, "ignoring diagnosis"))?
            .ok_or_else(|| {
                tracing::warn!("ignoring empty diagnosis");
                ViewerError::MissingDiagnosis
            })?;
        self.render_diagnosis(&diagnosis)
    }

    /// Highlights a valve (default red). Returns the number of meshes matched.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn highlight_valve(&mut self, name: &str, color: Option<Color>) -> Result<usize> {
        let model = Self::ready_model(&mut self.model, self.disposed, "highlight_valve")?;
        let highlight = Highlight::valve(name, color.unwrap_or(Color::RED));
        Ok(highlight.execute(model, &mut self.highlights))
    }

    /// Highlights a valve in the backflow color.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn simulate_regurgitation(&mut self, valve: &str) -> Result<usize> {
        tracing::info!(valve, "simulating regurgitation");
        self.highlight_valve(valve, Some(Color::BACKFLOW))
    }

    /// Highlights a coronary artery (default amber). Returns the number of
    /// meshes matched.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn highlight_coronary_artery(&mut self, name: &str, color: Option<Color>) -> Result<usize> {
        let model =
            Self::ready_model(&mut self.model, self.disposed, "highlight_coronary_artery")?;
        let highlight = Highlight::artery(name, color.unwrap_or(Color::AMBER));
        Ok(highlight.execute(model, &mut self.highlights))
    }

    /// Colors a coronary artery by plaque severity.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn add_plaque_overlay(&mut self, artery: &str, params: &PlaqueParams) -> Result<usize> {
        let model = Self::ready_model(&mut self.model, self.disposed, "add_plaque_overlay")?;
        Ok(PlaqueOverlay::new(artery, params).execute(model, &mut self.highlights))
    }

    /// Attaches tooltip text to meshes whose names contain `mesh_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn attach_tooltip(&mut self, mesh_name: &str, text: &str) -> Result<usize> {
        let model = Self::ready_model(&mut self.model, self.disposed, "attach_tooltip")?;
        Ok(self.tooltips.attach(model, mesh_name, text))
    }

    /// Forwards a restricted-flow region to the particle system.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn restrict_blood_flow(&mut self, region: serde_json::Value) -> Result<()> {
        Self::ready_model(&mut self.model, self.disposed, "restrict_blood_flow")?;
        self.flow.restrict(region);
        Ok(())
    }

    /// Restores every highlighted mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded or the viewer is disposed.
    pub fn clear_highlights(&mut self) -> Result<()> {
        let model = Self::ready_model(&mut self.model, self.disposed, "clear_highlights")?;
        self.highlights.clear_all(model);
        Ok(())
    }

    /// Stops the render loop and releases particles, highlights, tooltips
    /// and scene resources. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.flow.disable(&mut self.scene);
        self.flow.clear_restrictions();
        self.clock.disable();
        if let Some(model) = self.model.as_mut() {
            self.highlights.clear_all(model);
        }
        self.tooltips.clear();
        self.scene.release();
        self.model = None;
        self.running = false;
        self.disposed = true;
        tracing::info!("heart viewer disposed");
    }

    /// Whether a model is loaded and the viewer is not disposed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.model.is_some() && !self.disposed
    }

    /// Whether the host should keep scheduling frames.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether auto-rotation is on.
    #[must_use]
    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate
    }

    /// Returns the tooltip attached to a mesh.
    #[must_use]
    pub fn tooltip(&self, mesh: MeshId) -> Option<&str> {
        self.tooltips.get(mesh)
    }

    /// Returns the loaded model.
    #[must_use]
    pub fn model(&self) -> Option<&ModelGraph> {
        self.model.as_ref()
    }

    /// Returns the highlight registry.
    #[must_use]
    pub fn highlights(&self) -> &HighlightRegistry {
        &self.highlights
    }

    /// Returns the tooltip store.
    #[must_use]
    pub fn tooltips(&self) -> &TooltipStore {
        &self.tooltips
    }

    /// Returns the particle system.
    #[must_use]
    pub fn flow(&self) -> &BloodFlow {
        &self.flow
    }

    /// Returns the cardiac clock.
    #[must_use]
    pub fn clock(&self) -> &CardiacClock {
        &self.clock
    }

    /// Returns the camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Returns the scene.
    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Returns the active config.
    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    fn ready_model<'m>(
        model: &'m mut Option<ModelGraph>,
        disposed: bool,
        operation: &'static str,
    ) -> Result<&'m mut ModelGraph> {
        if disposed {
            tracing::warn!(operation, "viewer already disposed");
            return Err(ViewerError::Disposed.into());
        }
        model.as_mut().ok_or_else(|| {
            tracing::warn!(operation, "heart model not loaded yet");
            ViewerError::ModelNotLoaded.into()
        })
    }
}
