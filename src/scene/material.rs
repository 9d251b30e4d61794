use serde::{Deserialize, Serialize};

/// 24-bit RGB color stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x00_00_00);
    pub const RED: Color = Color(0xff_00_00);
    pub const ORANGE: Color = Color(0xff_88_00);
    pub const AMBER: Color = Color(0xff_a5_00);
    pub const BACKFLOW: Color = Color(0xff_66_00);
    pub const YELLOW: Color = Color(0xff_ff_00);
    pub const GREEN: Color = Color(0x00_ff_00);
    pub const TISSUE: Color = Color(0xcc_cc_cc);
}

/// Surface appearance of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color.
    pub color: Color,
    /// Self-illumination color.
    pub emissive: Color,
    /// Strength of `emissive`.
    pub emissive_intensity: f64,
}

impl Material {
    /// A glowing material whose emissive color matches its base color.
    #[must_use]
    pub fn glowing(color: Color, emissive_intensity: f64) -> Self {
        Self {
            color,
            emissive: color,
            emissive_intensity,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::TISSUE,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
        }
    }
}
