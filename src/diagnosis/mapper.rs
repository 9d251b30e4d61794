use crate::flow::BloodFlow;
use crate::highlight::{
    organ_risk_material, valve_disease_color, Highlight, HighlightRegistry, PlaqueOverlay,
    TooltipStore,
};
use crate::scene::{Color, ModelGraph};

use super::DiagnosisDescription;

/// Summary of what a diagnosis render changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosisOutcome {
    /// Meshes matched by valve highlights.
    pub valve_meshes: usize,
    /// Meshes matched by plaque overlays.
    pub artery_meshes: usize,
    /// Mean plaque severity, when the whole organ was recolored because no
    /// artery mesh matched.
    pub organ_fallback: Option<f64>,
    /// Regions forwarded to the flow-restriction hook.
    pub restricted_regions: usize,
    /// Meshes that received a tooltip.
    pub tooltip_meshes: usize,
}

/// Maps a [`DiagnosisDescription`] onto the loaded model.
///
/// Starts by clearing every prior highlight, so rendering the same
/// description twice yields the same highlights. Tooltips and flow
/// restrictions accumulate; a tooltip for an already annotated mesh replaces
/// the old text.
pub struct RenderDiagnosis<'a> {
    diagnosis: &'a DiagnosisDescription,
}

impl<'a> RenderDiagnosis<'a> {
    /// Creates a new `RenderDiagnosis` operation.
    #[must_use]
    pub fn new(diagnosis: &'a DiagnosisDescription) -> Self {
        Self { diagnosis }
    }

    /// Executes the mapping against the model and its bookkeeping.
    pub fn execute(
        &self,
        model: &mut ModelGraph,
        registry: &mut HighlightRegistry,
        tooltips: &mut TooltipStore,
        flow: &mut BloodFlow,
    ) -> DiagnosisOutcome {
        let d = self.diagnosis;
        let mut outcome = DiagnosisOutcome::default();

        registry.clear_all(model);

        if let Some(view) = d.view {
            model.apply_view(view);
        }

        if let Some(valve) = &d.highlight_valve {
            outcome.valve_meshes += Highlight::valve(valve, Color::RED).execute(model, registry);
        }

        if let Some(disease) = &d.valvular_disease {
            let color = if disease.is_regurgitation() {
                tracing::info!(valve = %disease.valve, "simulating regurgitation");
                Color::BACKFLOW
            } else {
                valve_disease_color(disease.severity)
            };
            outcome.valve_meshes +=
                Highlight::valve(&disease.valve, color).execute(model, registry);
        }

        if let Some(plaques) = &d.coronary_plaque {
            for plaque in plaques {
                let overlay = PlaqueOverlay::new(&plaque.artery, &plaque.plaque_params);
                outcome.artery_meshes += overlay.execute(model, registry);
            }
            if outcome.artery_meshes == 0 {
                if let Some(mean) = d.mean_plaque_severity() {
                    apply_organ_fallback(model, registry, mean);
                    outcome.organ_fallback = Some(mean);
                }
            }
        }

        if let Some(regions) = &d.restricted_flow {
            for region in regions {
                flow.restrict(region.clone());
            }
            outcome.restricted_regions = regions.len();
        }

        if let Some(tips) = &d.tooltips {
            for (mesh_name, text) in tips {
                outcome.tooltip_meshes += tooltips.attach(model, mesh_name, text);
            }
        }

        tracing::info!(?outcome, "diagnosis rendered");
        outcome
    }
}

/// Recolors the whole organ by aggregate risk. Meshes already highlighted by
/// this diagnosis keep their highlight.
fn apply_organ_fallback(model: &mut ModelGraph, registry: &mut HighlightRegistry, mean: f64) {
    let material = organ_risk_material(mean);
    let targets = model.find(|_| true);
    let mut recolored = 0;
    for mesh in targets {
        if registry.entry(mesh).is_none() {
            registry.apply(model, mesh, material);
            recolored += 1;
        }
    }
    tracing::debug!(mean, recolored, "no artery meshes matched, recolored whole organ");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::anatomy::PathCatalog;
    use crate::flow::FlowConfig;
    use crate::highlight::ARTERY_GLOW;
    use crate::scene::{MeshData, MeshId};

    struct Fixture {
        model: ModelGraph,
        registry: HighlightRegistry,
        tooltips: TooltipStore,
        flow: BloodFlow,
    }

    impl Fixture {
        fn new(names: &[&str]) -> Self {
            let mut model = ModelGraph::new();
            for name in names {
                model.add_mesh(MeshData::new(*name));
            }
            Self {
                model,
                registry: HighlightRegistry::new(),
                tooltips: TooltipStore::new(),
                flow: BloodFlow::new(FlowConfig::default(), PathCatalog::anatomical().unwrap()),
            }
        }

        fn render(&mut self, json: &str) -> DiagnosisOutcome {
            let diagnosis = DiagnosisDescription::from_json(json).unwrap().unwrap();
            RenderDiagnosis::new(&diagnosis).execute(
                &mut self.model,
                &mut self.registry,
                &mut self.tooltips,
                &mut self.flow,
            )
        }

        fn mesh(&self, name: &str) -> MeshId {
            self.model.find(|m| m.name == name)[0]
        }
    }

    #[test]
    fn single_mesh_model_falls_back_to_whole_organ() {
        let mut fx = Fixture::new(&["Heart"]);
        let outcome = fx.render(
            r#"{"coronaryPlaque": [
                {"artery": "LAD", "plaqueParams": {"severity": 0.8}},
                {"artery": "RCA", "plaqueParams": {"severity": 0.8}}
            ]}"#,
        );

        assert_eq!(outcome.artery_meshes, 0);
        assert!((outcome.organ_fallback.unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(fx.registry.len(), 1);
        let entry = fx.registry.entry(fx.mesh("Heart")).unwrap();
        assert_eq!(entry.color, Color::RED);
        assert!((entry.emissive_intensity - 0.8).abs() < 1e-12);
    }

    #[test]
    fn named_artery_is_highlighted_without_fallback() {
        let mut fx = Fixture::new(&["Heart", "LAD_artery", "RCA_artery"]);
        let outcome = fx.render(
            r#"{"coronaryPlaque": [{"artery": "LAD", "plaqueParams": {"severity": 0.9}}]}"#,
        );

        assert!(outcome.organ_fallback.is_none());
        assert_eq!(fx.registry.len(), 1);
        let entry = fx.registry.entry(fx.mesh("LAD_artery")).unwrap();
        assert_eq!(entry.color, Color::RED);
        assert!((entry.emissive_intensity - ARTERY_GLOW).abs() < 1e-12);
        assert!(fx.registry.entry(fx.mesh("Heart")).is_none());
    }

    #[test]
    fn repeated_render_is_idempotent() {
        let json = r#"{
            "highlightValve": "tricuspid",
            "valvularDisease": {"valve": "mitral", "type": "stenosis", "severity": 0.5},
            "coronaryPlaque": [{"artery": "RCA", "plaqueParams": {"severity": 0.3}}]
        }"#;
        let mut fx = Fixture::new(&["Heart", "TV", "MV", "RCA_artery"]);
        fx.render(json);
        let first: Vec<_> = fx.registry.entries().copied().collect();
        fx.render(json);
        let second: Vec<_> = fx.registry.entries().copied().collect();
        assert_eq!(first, second);
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn regurgitation_uses_backflow_color() {
        let mut fx = Fixture::new(&["aortic_valve"]);
        fx.render(
            r#"{"valvularDisease":
                {"valve": "aortic", "type": "regurgitation", "severity": 0.9}}"#,
        );
        let entry = fx.registry.entry(fx.mesh("aortic_valve")).unwrap();
        assert_eq!(entry.color, Color::BACKFLOW);
    }

    #[test]
    fn severe_stenosis_is_red_mild_is_orange() {
        let mut fx = Fixture::new(&["mitral_valve"]);
        fx.render(
            r#"{"valvularDisease": {"valve": "mitral", "type": "stenosis", "severity": 0.9}}"#,
        );
        assert_eq!(fx.registry.entry(fx.mesh("mitral_valve")).unwrap().color, Color::RED);
        fx.render(
            r#"{"valvularDisease": {"valve": "mitral", "type": "stenosis", "severity": 0.2}}"#,
        );
        assert_eq!(fx.registry.entry(fx.mesh("mitral_valve")).unwrap().color, Color::ORANGE);
    }

    #[test]
    fn fallback_keeps_valve_highlights() {
        let mut fx = Fixture::new(&["Heart", "mitral_valve"]);
        fx.render(
            r#"{"highlightValve": "mitral",
                "coronaryPlaque": [{"artery": "LAD", "plaqueParams": {"severity": 0.2}}]}"#,
        );
        assert_eq!(fx.registry.entry(fx.mesh("mitral_valve")).unwrap().color, Color::RED);
        assert_eq!(fx.registry.entry(fx.mesh("Heart")).unwrap().color, Color::GREEN);
    }

    #[test]
    fn empty_plaque_list_does_not_fall_back() {
        let mut fx = Fixture::new(&["Heart"]);
        let outcome = fx.render(r#"{"coronaryPlaque": []}"#);
        assert!(outcome.organ_fallback.is_none());
        assert!(fx.registry.is_empty());
    }

    #[test]
    fn tooltips_and_restrictions_are_forwarded() {
        let mut fx = Fixture::new(&["LAD_artery"]);
        let outcome = fx.render(
            r#"{"restrictedFlow": [{"min": [0, 0, 0]}, {"max": [1, 1, 1]}],
                "tooltips": {"lad": "Proximal lesion"}}"#,
        );
        assert_eq!(outcome.restricted_regions, 2);
        assert_eq!(fx.flow.restrictions().len(), 2);
        assert_eq!(fx.tooltips.get(fx.mesh("LAD_artery")), Some("Proximal lesion"));
    }

    #[test]
    fn tooltips_and_restrictions_survive_later_diagnoses() {
        let mut fx = Fixture::new(&["LAD_artery", "mitral_valve"]);
        fx.render(
            r#"{"restrictedFlow": [{"min": [0, 0, 0]}],
                "tooltips": {"lad": "Proximal lesion"}}"#,
        );
        fx.render(r#"{"highlightValve": "mitral", "tooltips": {"mitral": "Prolapse"}}"#);

        assert_eq!(fx.tooltips.len(), 2);
        assert_eq!(fx.tooltips.get(fx.mesh("LAD_artery")), Some("Proximal lesion"));
        assert_eq!(fx.flow.restrictions().len(), 1);
    }

    #[test]
    fn new_diagnosis_clears_previous_highlights() {
        let mut fx = Fixture::new(&["mitral_valve", "aortic_valve"]);
        fx.render(r#"{"highlightValve": "mitral"}"#);
        fx.render(r#"{"highlightValve": "aortic"}"#);
        assert_eq!(fx.registry.len(), 1);
        assert!(fx.registry.entry(fx.mesh("mitral_valve")).is_none());
    }
}
