use super::{Matrix4, Point3, Vector3};

/// Builds the organ root transform: recenter, scale uniformly, then spin
/// about the vertical axis.
///
/// * `center` - Model-space point moved to the origin.
/// * `scale` - Uniform scale factor (the cardiac cycle's ventricular scale).
/// * `yaw` - Rotation about +Y in radians (auto-rotation).
#[must_use]
pub fn organ_transform(center: &Point3, scale: f64, yaw: f64) -> Matrix4 {
    let recenter = Matrix4::new_translation(&(-center.coords));
    let scaling = Matrix4::new_scaling(scale);
    let spin = rotation_matrix(&Vector3::y(), yaw);
    spin * scaling * recenter
}

/// Builds a 4x4 rotation matrix around a unit axis by an angle (Rodrigues).
#[allow(clippy::many_single_char_names)]
#[must_use]
pub fn rotation_matrix(axis: &Vector3, angle: f64) -> Matrix4 {
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    #[allow(clippy::suspicious_operation_groupings)]
    Matrix4::new(
        t * x * x + c,     t * x * y - s * z, t * x * z + s * y, 0.0,
        t * x * y + s * z, t * y * y + c,     t * y * z - s * x, 0.0,
        t * x * z - s * y, t * y * z + s * x, t * z * z + c,     0.0,
        0.0,               0.0,               0.0,               1.0,
    )
}
