use super::ShapeHit;
use crate::math::{Bounds3, Ray, Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Shapes/Spheres.html

/// An analytic sphere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3<f32>,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn world_bound(&self) -> Bounds3<f32> {
        let r = Vec3::new(self.radius, self.radius, self.radius);
        Bounds3::new(self.center - r, self.center + r)
    }

    /// Finds the nearest intersection within the ray's interval.
    pub fn intersect(&self, ray: &Ray<f32>) -> Option<ShapeHit> {
        let o = ray.o - self.center;
        let d = ray.d;

        // Quadratic coefficients
        let a = d.dot(d);
        let b = 2.0 * d.dot(o);
        let c = o.dot(o) - self.radius * self.radius;

        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let rd = disc.sqrt();

        // More stable quadratic roots as in pbrt
        let q = if b < 0.0 {
            -0.5 * (b - rd)
        } else {
            -0.5 * (b + rd)
        };
        let mut t0 = q / a;
        let mut t1 = c / q;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > ray.t_max || t1 <= ray.t_min {
            return None;
        }
        let mut t = t0;
        if t <= ray.t_min {
            t = t1;
            if t > ray.t_max {
                return None;
            }
        }

        let normal = (ray.point(t) - self.center) * (1.0 / self.radius);
        Some(ShapeHit { t, normal })
    }
}
