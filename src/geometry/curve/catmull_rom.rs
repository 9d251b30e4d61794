use crate::error::{GeometryError, Result};
use crate::math::Point3;

use super::Curve;

/// Knot intervals shorter than this are treated as coincident points.
const MIN_KNOT_INTERVAL: f64 = 1e-4;

/// An open centripetal Catmull-Rom spline through an ordered set of control
/// points, parameterized over `[0, 1]`.
///
/// The spline passes through every control point; `t = 0` is the first point
/// and `t = 1` the last. Neighbors beyond either end are clamped to the end
/// points.
#[derive(Debug, Clone, PartialEq)]
pub struct CatmullRom {
    points: Vec<Point3>,
}

impl CatmullRom {
    /// Creates a new spline from at least two finite control points.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two points are given or any coordinate
    /// is NaN or infinite.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewControlPoints {
                count: points.len(),
            }
            .into());
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(GeometryError::NonFinite { index }.into());
        }
        Ok(Self { points })
    }

    /// Returns the control points in flow order.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Returns the first control point.
    #[must_use]
    pub fn start(&self) -> Point3 {
        self.points[0]
    }

    /// Returns the last control point.
    #[must_use]
    pub fn end(&self) -> Point3 {
        self.points[self.points.len() - 1]
    }
}

impl Curve for CatmullRom {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn evaluate(&self, t: f64) -> Point3 {
        if t.is_nan() || t <= 0.0 {
            return self.start();
        }
        if t >= 1.0 {
            return self.end();
        }

        let last = self.points.len() - 1;
        let s = t * last as f64;
        let segment = (s.floor() as usize).min(last - 1);
        let local = s - segment as f64;

        let p0 = self.points[segment.saturating_sub(1)];
        let p1 = self.points[segment];
        let p2 = self.points[segment + 1];
        let p3 = self.points[(segment + 2).min(last)];

        centripetal_segment(&p0, &p1, &p2, &p3, local)
    }
}

/// Evaluates the centripetal segment between `p1` and `p2` at local
/// parameter `w` in `[0, 1)`.
///
/// Knot intervals are the square roots of the chord lengths; the tangents
/// they produce are then fed through a cubic Hermite basis per axis.
fn centripetal_segment(p0: &Point3, p1: &Point3, p2: &Point3, p3: &Point3, w: f64) -> Point3 {
    let mut dt0 = (p1 - p0).norm().sqrt();
    let mut dt1 = (p2 - p1).norm().sqrt();
    let mut dt2 = (p3 - p2).norm().sqrt();

    if dt1 < MIN_KNOT_INTERVAL {
        dt1 = 1.0;
    }
    if dt0 < MIN_KNOT_INTERVAL {
        dt0 = dt1;
    }
    if dt2 < MIN_KNOT_INTERVAL {
        dt2 = dt1;
    }

    let axis = |i: usize| {
        let (x0, x1, x2, x3) = (p0[i], p1[i], p2[i], p3[i]);
        let m1 = ((x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1) * dt1;
        let m2 = ((x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2) * dt1;
        hermite(x1, x2, m1, m2, w)
    };

    Point3::new(axis(0), axis(1), axis(2))
}

/// Cubic Hermite interpolation from `x1` to `x2` with end tangents `m1`, `m2`.
fn hermite(x1: f64, x2: f64, m1: f64, m2: f64, w: f64) -> f64 {
    let c2 = -3.0 * x1 + 3.0 * x2 - 2.0 * m1 - m2;
    let c3 = 2.0 * x1 - 2.0 * x2 + m1 + m2;
    x1 + w * (m1 + w * (c2 + w * c3))
}
