use crate::scene::{Color, Material};

/// Plaque overlay color: red above 0.7, orange above 0.4, yellow otherwise.
#[must_use]
pub fn plaque_color(severity: f64) -> Color {
    if severity > 0.7 {
        Color::RED
    } else if severity > 0.4 {
        Color::ORANGE
    } else {
        Color::YELLOW
    }
}

/// Valve disease color: red above 0.7, orange otherwise.
#[must_use]
pub fn valve_disease_color(severity: f64) -> Color {
    if severity > 0.7 {
        Color::RED
    } else {
        Color::ORANGE
    }
}

/// Whole-organ material for an aggregate coronary risk score.
///
/// Bands: up to 0.3 green, up to 0.5 yellow, up to 0.7 orange, above that
/// red, each glowing brighter than the last.
#[must_use]
pub fn organ_risk_material(mean_severity: f64) -> Material {
    let (color, glow) = if mean_severity <= 0.3 {
        (Color::GREEN, 0.2)
    } else if mean_severity <= 0.5 {
        (Color::YELLOW, 0.4)
    } else if mean_severity <= 0.7 {
        (Color::ORANGE, 0.6)
    } else {
        (Color::RED, 0.8)
    };
    Material::glowing(color, glow)
}
