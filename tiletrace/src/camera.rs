use crate::{
    hit::{HitRecord, TraceResult},
    math::Vec3,
    sampling::Sampler,
    scene::SceneRef,
};

/// Maps a (possibly fractional) pixel position to a camera-space ray
/// direction with a pinhole perspective projection. The camera sits at the
/// origin looking down +Z.
pub fn pixel_to_ray_dir(col: f32, row: f32, width: f32, height: f32, tan_half_fov: f32) -> Vec3<f32> {
    let aspect = width / height;
    let px = (2.0 * (col + 0.5) / width - 1.0) * tan_half_fov * aspect;
    let py = (1.0 - 2.0 * (row + 0.5) / height) * tan_half_fov;
    Vec3::new(px, py, 1.0).normalized()
}

/// Regenerates camera rays for one worker's slots, jittering each ray around
/// its stored pixel coordinate for antialiasing.
///
/// Resets the whole hit record, so flags and throughput from the previous
/// sample are cleared. The accumulated color is left alone.
pub fn generate_camera_rays(
    results: &mut [&mut TraceResult],
    scene: &SceneRef,
    sampler: &mut dyn Sampler,
) {
    let tan_half_fov = (scene.fov_radians / 2.0).tan();
    let origin = Vec3::zeros();

    for result in results.iter_mut() {
        let (u1, u2) = sampler.get_2d();
        let row = result.p.row + scene.anti_alias_scale * (u1 - 0.5);
        let col = result.p.col + scene.anti_alias_scale * (u2 - 0.5);
        let dir = pixel_to_ray_dir(col, row, scene.image_width, scene.image_height, tan_half_fov);
        result.h = HitRecord::new(origin, dir);
    }
}
