use super::{offset_ray, RAY_EPSILON};
use crate::{
    bvh::Intersection,
    hit::{HitFlags, TraceResult},
    math::{Ray, Vec3},
    scene::SceneContext,
};

/// Single-bounce ray trace over one worker's ray slots, for validation
/// renders. Rays are taken as initialized by the caller; there is no
/// resampling.
///
/// One closest-hit query per ray, then one shadow ray from the hit point
/// toward a fixed point light. Output is an ambient term plus a direct term
/// gated by shadow-ray visibility; there is no throughput chain.
pub fn shadow_trace_worker(
    context: &SceneContext,
    ambient_light_factor: f32,
    light_pos: Vec3<f32>,
    results: &mut [&mut TraceResult],
) {
    let bvh = context.bvh();

    for result in results.iter_mut() {
        let hit = &mut result.h;
        hit.r.t_min = 0.0;
        hit.r.t_max = f32::INFINITY;

        let intersected = bvh.intersect(&mut hit.r, |geom_id, prim_id, ray| {
            context.intersect_prim(geom_id, prim_id, ray)
        });

        let Some(Intersection {
            t,
            normal,
            geom_id,
            prim_id,
        }) = intersected
        else {
            hit.flags |= HitFlags::ESCAPED;
            continue;
        };

        hit.r.o = hit.r.point(t);
        hit.normal = normal;
        hit.geom_id = geom_id;
        hit.prim_id = prim_id;

        let Some(material) = context.material_for(geom_id) else {
            result.rgb *= f32::NAN;
            hit.flags |= HitFlags::ERROR;
            continue;
        };

        let mut color = material.albedo * ambient_light_factor;

        let to_light = light_pos - hit.r.o;
        let distance = to_light.len();
        let light_dir = to_light * (1.0 / distance);
        let mut shadow_ray = Ray::new(hit.r.o, light_dir);
        offset_ray(&mut shadow_ray, hit.normal);
        shadow_ray.t_max = distance - RAY_EPSILON;

        let occluded = bvh.any_intersect(&shadow_ray, |geom_id, prim_id, ray| {
            context.intersect_prim(geom_id, prim_id, ray)
        });
        if !occluded {
            color += material.albedo * hit.normal.dot(light_dir).max(0.0);
        }

        result.rgb += color;
    }
}
