use super::{common::FloatValueType, ray::Ray, vector::Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Bounding_Boxes.html

/// Three-dimensional axis-aligned bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3<T>
where
    T: FloatValueType,
{
    /// The minimum extent of the bounds.
    pub p_min: Vec3<T>,
    /// The maximum extent of the bounds.
    pub p_max: Vec3<T>,
}

impl<T> Bounds3<T>
where
    T: FloatValueType,
{
    pub fn new(p_min: Vec3<T>, p_max: Vec3<T>) -> Self {
        Self { p_min, p_max }
    }

    /// Extends the bounds to contain the given point.
    pub fn union_p(&self, p: Vec3<T>) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Extends the bounds to contain the other bounds.
    pub fn union_b(&self, other: Self) -> Self {
        Self {
            p_min: self.p_min.min(other.p_min),
            p_max: self.p_max.max(other.p_max),
        }
    }

    pub fn diagonal(&self) -> Vec3<T> {
        self.p_max - self.p_min
    }

    pub fn centroid(&self) -> Vec3<T> {
        (self.p_min + self.p_max) * T::from_f32(0.5).unwrap()
    }

    /// Finds the maximum extent of this `Bounds3`
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Finds the parametric distances at which `ray` enters and exits these
    /// bounds, clipped to the ray's own `[t_min, t_max]` interval. Returns
    /// `None` if the ray misses the bounds within that interval.
    pub fn intersections(&self, ray: Ray<T>) -> Option<(T, T)> {
        let mut t0 = ray.t_min;
        let mut t1 = ray.t_max;
        for i in 0..3 {
            let inv_d = T::one() / ray.d[i];
            let mut t_near = (self.p_min[i] - ray.o[i]) * inv_d;
            let mut t_far = (self.p_max[i] - ray.o[i]) * inv_d;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            if t_near > t0 {
                t0 = t_near;
            }
            if t_far < t1 {
                t1 = t_far;
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
}

impl<T> Default for Bounds3<T>
where
    T: FloatValueType,
{
    /// Creates empty bounds: any union with a point or other bounds replaces them.
    fn default() -> Self {
        Self {
            p_min: Vec3::new(T::infinity(), T::infinity(), T::infinity()),
            p_max: Vec3::new(-T::infinity(), -T::infinity(), -T::infinity()),
        }
    }
}
