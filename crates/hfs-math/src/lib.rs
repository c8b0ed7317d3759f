pub mod aabb;

pub use glam::{DVec2, DVec3};
pub use aabb::Aabb3;

pub type Point2 = DVec2;
pub type Point3 = DVec3;
pub type Vector3 = DVec3;

/// World up axis; the height field is sampled as `z = f(x, y)`.
pub const UP: Vector3 = DVec3::Z;
