use super::offset_ray;
use crate::{
    bvh::Intersection,
    hit::{HitFlags, HitRecord, TraceResult},
    materials::{reflect, sample_dielectric, sample_diffuse, MaterialKind},
    math::Vec3,
    sampling::Sampler,
    scene::SceneContext,
};

/// Unidirectional path trace over one worker's ray slots.
///
/// There is no light sampling; emissive surfaces are found by chance, so the
/// estimator relies on many samples. Each sample regenerates the camera rays
/// from the stored pixel coordinates before bouncing.
pub fn path_trace_worker(
    context: &SceneContext,
    sampler: &mut dyn Sampler,
    results: &mut [&mut TraceResult],
    sample_count: u32,
) {
    let scene = &context.scene;
    let bvh = context.bvh();

    for _ in 0..sample_count {
        crate::camera::generate_camera_rays(results, scene, sampler);

        for result in results.iter_mut() {
            let hit = &mut result.h;
            hit.throughput = Vec3::ones();
            let mut color = Vec3::zeros();

            for bounce in 0..scene.max_path_length {
                offset_ray(&mut hit.r, hit.normal);
                hit.r.t_min = 0.0;
                hit.r.t_max = f32::INFINITY;

                let intersected = bvh.intersect(&mut hit.r, |geom_id, prim_id, ray| {
                    context.intersect_prim(geom_id, prim_id, ray)
                });

                match intersected {
                    Some(intersection) => {
                        update_hit(&intersection, hit);

                        let Some(material) = context.material_for(hit.geom_id) else {
                            // A bad material binding poisons the output
                            // in-band instead of aborting the kernel
                            result.rgb *= f32::NAN;
                            hit.flags |= HitFlags::ERROR;
                            break;
                        };

                        if material.emissive {
                            color += hit.throughput * material.emission;
                        }

                        match material.kind {
                            MaterialKind::Diffuse => {
                                let (u1, u2) = sampler.get_2d();
                                hit.r.d = sample_diffuse(hit.normal, u1, u2);
                                // Cosine and PDF terms cancel for
                                // cosine-weighted samples
                                hit.throughput *= material.albedo;
                            }
                            MaterialKind::Specular => {
                                hit.r.d = reflect(hit.r.d, hit.normal);
                                hit.throughput *= material.albedo;
                            }
                            MaterialKind::Refractive => {
                                let u1 = sampler.get_1d();
                                let (dir, refracted) =
                                    sample_dielectric(hit.r.d, hit.normal, material.ior, u1);
                                hit.r.d = dir;
                                if refracted {
                                    hit.throughput *= material.albedo;
                                }
                            }
                        }
                    }
                    None => {
                        hit.flags |= HitFlags::ESCAPED;
                        break;
                    }
                }

                // Random stopping, uncompensated
                if bounce > scene.roulette_start_depth {
                    let u1 = sampler.get_1d();
                    if evaluate_roulette(u1, hit.throughput) {
                        break;
                    }
                }
            }

            result.rgb += color;
        }
    }
}

/// Moves the path onto the intersected surface and records what was hit.
fn update_hit(intersection: &Intersection, hit: &mut HitRecord) {
    hit.r.o = hit.r.point(intersection.t);
    hit.normal = intersection.normal;
    hit.geom_id = intersection.geom_id;
    hit.prim_id = intersection.prim_id;
}

/// Returns `true` if the path should terminate. Survival probability is the
/// largest throughput component; dim paths die sooner.
fn evaluate_roulette(u1: f32, throughput: Vec3<f32>) -> bool {
    u1 >= throughput.max_comp().clamp(0.0, 1.0)
}
