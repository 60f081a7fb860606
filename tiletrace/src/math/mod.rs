mod bounds;
mod common;
mod ray;
mod vector;

pub use bounds::Bounds3;
pub use common::{FloatValueType, Maxi, Mini, ValueType};
pub use ray::Ray;
pub use vector::{vec2, vec3, Vec2, Vec3};
