use super::ShapeHit;
use crate::math::{Bounds3, Ray, Vec3};

/// An analytic flat disc described by a plane normal, a center point and a
/// radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Disc {
    pub normal: Vec3<f32>,
    pub center: Vec3<f32>,
    pub radius: f32,
}

impl Disc {
    pub fn new(normal: Vec3<f32>, center: Vec3<f32>, radius: f32) -> Self {
        Self {
            normal,
            center,
            radius,
        }
    }

    pub fn world_bound(&self) -> Bounds3<f32> {
        // Conservative: the bound of the sphere the disc is inscribed in
        let r = Vec3::new(self.radius, self.radius, self.radius);
        Bounds3::new(self.center - r, self.center + r)
    }

    /// Finds the intersection with the disc's plane, accepted if it falls
    /// inside the radius and the ray's interval.
    pub fn intersect(&self, ray: &Ray<f32>) -> Option<ShapeHit> {
        let denom = self.normal.dot(ray.d);
        if denom.abs() < 1e-9 {
            // Ray parallel to the disc plane
            return None;
        }

        let t = (self.center - ray.o).dot(self.normal) / denom;
        if t <= ray.t_min || t > ray.t_max {
            return None;
        }

        let p = ray.point(t);
        if (p - self.center).len_sqr() > self.radius * self.radius {
            return None;
        }

        Some(ShapeHit {
            t,
            normal: self.normal,
        })
    }
}
