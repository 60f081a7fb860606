mod disc;
mod mesh;
mod sphere;

pub use disc::Disc;
pub use mesh::{intersect_mesh, MeshInfo, Triangle};
pub use sphere::Sphere;

use crate::math::Vec3;

/// The closed set of primitive kinds the tracer understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GeomType {
    Mesh = 0,
    Sphere = 1,
    Disc = 2,
}

impl GeomType {
    /// Decodes a wire tag into a `GeomType`. Unknown tags are a
    /// deserialization error, not a runtime fallback.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Mesh),
            1 => Some(Self::Sphere),
            2 => Some(Self::Disc),
            _ => None,
        }
    }
}

/// Identifies one primitive instance: a kind plus an index into the
/// corresponding typed array. Index validity is enforced when the scene
/// context is built and trusted at trace time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GeomRef {
    pub index: u16,
    pub kind: GeomType,
}

impl GeomRef {
    pub fn new(index: u16, kind: GeomType) -> Self {
        Self { index, kind }
    }
}

/// Result of a single primitive intersection test.
#[derive(Copy, Clone, Debug)]
pub struct ShapeHit {
    pub t: f32,
    pub normal: Vec3<f32>,
}
