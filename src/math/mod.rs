mod aabb;
mod transform;

pub use aabb::Aabb;
pub use transform::{organ_transform, rotation_matrix};

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;
