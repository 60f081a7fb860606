mod bsdf;

pub use bsdf::{reflect, sample_dielectric, sample_diffuse};

use crate::math::Vec3;

/// The closed set of BSDF kinds. Emission is an orthogonal material property,
/// not a kind of its own.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    Diffuse = 0,
    Specular = 1,
    Refractive = 2,
}

impl MaterialKind {
    /// Decodes a wire tag. Unknown tags fail at the deserialization trust
    /// boundary instead of surfacing as a shading-time fallback.
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::Diffuse),
            1 => Some(Self::Specular),
            2 => Some(Self::Refractive),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub emissive: bool,
    pub albedo: Vec3<f32>,
    pub ior: f32,
    pub emission: Vec3<f32>,
}

impl Material {
    /// A non-emissive diffuse material with the given albedo.
    pub fn diffuse(albedo: Vec3<f32>) -> Self {
        Self {
            kind: MaterialKind::Diffuse,
            emissive: false,
            albedo,
            ior: 1.0,
            emission: Vec3::zeros(),
        }
    }

    /// Marks the material as emissive with the given emission color.
    pub fn with_emission(mut self, emission: Vec3<f32>) -> Self {
        self.emissive = true;
        self.emission = emission;
        self
    }
}
