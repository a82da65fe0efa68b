pub mod sphere;
pub mod transform;
