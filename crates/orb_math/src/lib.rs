// Re-export glam for convenience
pub use glam::*;

// Orb math types
mod aabb;
mod interval;
mod ray;
pub mod sampling;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
