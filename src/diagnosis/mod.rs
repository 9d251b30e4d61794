//! Diagnosis-driven visualization.
//!
//! A [`DiagnosisDescription`] arrives as JSON from the host, is deserialized
//! once, and is mapped onto highlights, overlays, view mode and tooltips by
//! [`RenderDiagnosis`].

mod mapper;

pub use mapper::{DiagnosisOutcome, RenderDiagnosis};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::highlight::PlaqueParams;
use crate::scene::ViewMode;

/// Valve pathology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValvularDisease {
    pub valve: String,
    /// "regurgitation", "stenosis", ...
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: f64,
}

impl ValvularDisease {
    /// Whether the disease is a backflow through the valve.
    #[must_use]
    pub fn is_regurgitation(&self) -> bool {
        self.kind.eq_ignore_ascii_case("regurgitation")
    }
}

/// Plaque in one coronary artery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoronaryPlaque {
    pub artery: String,
    #[serde(default)]
    pub plaque_params: PlaqueParams,
}

/// Structured description of what to show. Every field is optional; absent
/// fields are simply not rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagnosisDescription {
    pub view: Option<ViewMode>,
    pub highlight_valve: Option<String>,
    pub valvular_disease: Option<ValvularDisease>,
    pub coronary_plaque: Option<Vec<CoronaryPlaque>>,
    /// Opaque region descriptors forwarded to the flow-restriction hook.
    pub restricted_flow: Option<Vec<serde_json::Value>>,
    /// Mesh name to tooltip text.
    pub tooltips: Option<BTreeMap<String, String>>,
}

impl DiagnosisDescription {
    /// Parses the wire form. A JSON `null` yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or has the wrong shape.
    pub fn from_json(json: &str) -> Result<Option<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Mean plaque severity, or `None` without plaque entries.
    #[must_use]
    pub fn mean_plaque_severity(&self) -> Option<f64> {
        let plaques = self.coronary_plaque.as_deref().filter(|p| !p.is_empty())?;
        let total: f64 = plaques.iter().map(|p| p.plaque_params.severity).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(total / plaques.len() as f64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_wire_shape() {
        let json = r#"{
            "view": "internal",
            "highlightValve": "mitral",
            "valvularDisease": {"valve": "aortic", "type": "stenosis", "severity": 0.8},
            "coronaryPlaque": [
                {"artery": "LAD",
                 "plaqueParams": {"severity": 0.9, "location": "mid", "type": "soft"}},
                {"artery": "RCA"}
            ],
            "restrictedFlow": [{"min": [0, 0, 0], "max": [1, 1, 1]}],
            "tooltips": {"LAD": "90% stenosis"}
        }"#;
        let d = DiagnosisDescription::from_json(json).unwrap().unwrap();
        assert_eq!(d.view, Some(ViewMode::Internal));
        assert_eq!(d.highlight_valve.as_deref(), Some("mitral"));
        assert_eq!(d.valvular_disease.as_ref().unwrap().kind, "stenosis");
        let plaques = d.coronary_plaque.as_ref().unwrap();
        assert_eq!(plaques[0].plaque_params.kind, "soft");
        assert!((plaques[1].plaque_params.severity - 0.5).abs() < f64::EPSILON);
        assert_eq!(d.restricted_flow.as_ref().unwrap().len(), 1);
        assert_eq!(d.tooltips.as_ref().unwrap()["LAD"], "90% stenosis");
    }

    #[test]
    fn empty_object_requests_nothing() {
        let d = DiagnosisDescription::from_json("{}").unwrap().unwrap();
        assert_eq!(d, DiagnosisDescription::default());
    }

    #[test]
    fn null_is_absent() {
        assert!(DiagnosisDescription::from_json("null").unwrap().is_none());
    }

    #[test]
    fn wrong_shape_is_an_error() {
        assert!(DiagnosisDescription::from_json(r#"{"coronaryPlaque": 3}"#).is_err());
    }

    #[test]
    fn mean_severity() {
        let d: DiagnosisDescription = serde_json::from_str(
            r#"{"coronaryPlaque": [
                {"artery": "LAD", "plaqueParams": {"severity": 0.6}},
                {"artery": "RCA", "plaqueParams": {"severity": 1.0}}
            ]}"#,
        )
        .unwrap();
        assert!((d.mean_plaque_severity().unwrap() - 0.8).abs() < 1e-12);
        assert!(DiagnosisDescription::default().mean_plaque_severity().is_none());
    }
}
