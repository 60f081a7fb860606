use super::{common::FloatValueType, vector::Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Rays.html

/// A ray with a parametric interval `[t_min, t_max]`.
///
/// The direction is assumed to be normalized by construction. Trace kernels
/// mutate rays in place between bounces (origin offset, interval reset).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray<T>
where
    T: FloatValueType,
{
    pub o: Vec3<T>,
    pub d: Vec3<T>,
    pub t_min: T,
    pub t_max: T,
}

impl<T> Ray<T>
where
    T: FloatValueType,
{
    /// Creates a new `Ray` over the interval `[0, inf)`.
    pub fn new(o: Vec3<T>, d: Vec3<T>) -> Self {
        let ret = Self {
            o,
            d,
            t_min: T::zero(),
            t_max: T::infinity(),
        };
        debug_assert!(!ret.has_nans());
        ret
    }

    /// Checks if any of the members in this `Ray` contain NaNs.
    pub fn has_nans(&self) -> bool {
        self.o.has_nans() || self.d.has_nans() || self.t_min.is_nan() || self.t_max.is_nan()
    }

    /// Finds the point on this `Ray` at distance `t`.
    pub fn point(&self, t: T) -> Vec3<T> {
        self.o + self.d * t
    }
}

impl<T> Default for Ray<T>
where
    T: FloatValueType,
{
    /// Creates an infinite `Ray` from the origin toward positive Y.
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::new(T::zero(), T::one(), T::zero()))
    }
}
