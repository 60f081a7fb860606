use crate::{
    hit::{HitFlags, TraceResult},
    math::Vec3,
};

use std::f32::consts::{PI, TAU};

/// Maps a normalized direction to equirectangular texture coordinates, with
/// an azimuth rotation folded into the longitude.
///
/// Returns (u, v) with u = theta / pi in [0, 1] and v = phi / (2 pi) in
/// [0, 1). At the poles phi is degenerate and v is whatever atan2 gives.
pub fn equirectangular_uv(dir: Vec3<f32>, azimuth_rotation: f32) -> (f32, f32) {
    let theta = dir.y.clamp(-1.0, 1.0).acos();
    let mut phi = dir.z.atan2(dir.x) + azimuth_rotation;
    if phi < 0.0 {
        phi += TAU;
    } else if phi >= TAU {
        phi -= TAU;
    }
    (theta / PI, phi / TAU)
}

/// Phase one of the escaped-ray protocol: the lookup coordinates for one ray.
/// Rays that did not escape get (0, 0) so no undefined values reach the
/// downstream sampler.
pub fn resolve_uv(result: &TraceResult, azimuth_rotation: f32) -> (f32, f32) {
    if result.h.flags.contains(HitFlags::ESCAPED) {
        equirectangular_uv(result.h.r.d, azimuth_rotation)
    } else {
        (0.0, 0.0)
    }
}

/// Phase two: folds an externally sampled environment color (blue/green/red
/// channel order) into an escaped ray's accumulated color, weighted by the
/// path throughput. Non-escaped rays are untouched.
pub fn apply_environment(result: &mut TraceResult, bgr: [f32; 3]) {
    if result.h.flags.contains(HitFlags::ESCAPED) {
        result.rgb += result.h.throughput * Vec3::new(bgr[2], bgr[1], bgr[0]);
    }
}
