use rand::{distributions::Standard, Rng};
use rand_pcg::Pcg32;

use crate::math::{vec2, vec3, Vec2, Vec3};

use std::f32::consts::{FRAC_PI_4, PI};

/// Source of uniform samples for a render worker.
pub trait Sampler: Send {
    /// The next sample in [0, 1).
    fn get_1d(&mut self) -> f32;

    /// The next two samples in [0, 1).
    fn get_2d(&mut self) -> (f32, f32);
}

/// A PCG-backed uniform sampler.
///
/// Each worker holds its own instance on a distinct stream so the workers
/// draw decorrelated sequences from the same seed.
pub struct UniformSampler {
    rng: Pcg32,
}

impl UniformSampler {
    pub fn new(seed: u64, stream: u64) -> Self {
        Self {
            rng: Pcg32::new(seed, stream),
        }
    }

    /// Reseeds in place, keeping the sampler's stream.
    pub fn reseed(&mut self, seed: u64, stream: u64) {
        self.rng = Pcg32::new(seed, stream);
    }
}

impl Sampler for UniformSampler {
    fn get_1d(&mut self) -> f32 {
        self.rng.sample(Standard)
    }

    fn get_2d(&mut self) -> (f32, f32) {
        (self.rng.sample(Standard), self.rng.sample(Standard))
    }
}

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Monte_Carlo_Integration/2D_Sampling_with_Multidimensional_Transformations

/// Maps two uniform samples to a cosine-weighted direction in the +Z
/// hemisphere.
pub fn cosine_sample_hemisphere(u1: f32, u2: f32) -> Vec3<f32> {
    let d = concentric_sample_disk(u1, u2);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    vec3(d.x, d.y, z)
}

/// Maps two uniform samples to the unit disk with a concentric mapping.
pub fn concentric_sample_disk(u1: f32, u2: f32) -> Vec2<f32> {
    let offset = vec2(u1, u2) * 2.0 - vec2(1.0, 1.0);

    if offset.x == 0.0 && offset.y == 0.0 {
        return vec2(0.0, 0.0);
    }

    let (r, theta) = if offset.x.abs() > offset.y.abs() {
        (offset.x, FRAC_PI_4 * (offset.y / offset.x))
    } else {
        (offset.y, PI / 2.0 - FRAC_PI_4 * (offset.x / offset.y))
    };
    vec2(theta.cos(), theta.sin()) * r
}
