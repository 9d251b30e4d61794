mod catmull_rom;

pub use catmull_rom::CatmullRom;

use crate::math::Point3;

/// Trait for parametric curves in 3D space over the unit parameter range.
///
/// Curves are validated when built, so evaluation is infallible and free of
/// side effects.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    fn evaluate(&self, t: f64) -> Point3;
}
