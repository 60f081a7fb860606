mod path;
mod shadow;

pub use path::path_trace_worker;
pub use shadow::shadow_trace_worker;

use crate::math::{Ray, Vec3};

/// Offset applied along the surface normal before the next bounce to avoid
/// self-re-intersection.
pub(crate) const RAY_EPSILON: f32 = 1e-3;

pub(crate) fn offset_ray(ray: &mut Ray<f32>, normal: Vec3<f32>) {
    ray.o += normal * RAY_EPSILON;
}
