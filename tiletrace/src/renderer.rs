use crate::{
    camera::generate_camera_rays,
    environment::{apply_environment, resolve_uv},
    hit::TraceResult,
    integrators::{path_trace_worker, shadow_trace_worker},
    math::Vec3,
    sampling::UniformSampler,
    scene::SceneContext,
    tiletrace_debug, tiletrace_error, tiletrace_warn,
};

/// Splits `items` into strided round-robin partitions: worker `i` gets
/// indices `i`, `i + worker_count`, `i + 2 * worker_count`, ...
///
/// Partitions are disjoint by construction so the workers share nothing.
fn strided_partitions<T>(items: &mut [T], worker_count: usize) -> Vec<Vec<&mut T>> {
    let mut partitions: Vec<Vec<&mut T>> = (0..worker_count)
        .map(|_| Vec::with_capacity(items.len() / worker_count + 1))
        .collect();
    for (i, item) in items.iter_mut().enumerate() {
        partitions[i % worker_count].push(item);
    }
    partitions
}

/// The worker group owning the trace entry points.
///
/// Holds the validated scene context and one persistent sampler per worker.
/// Entry points report failure with a boolean and log the cause; per-ray
/// conditions travel in the hit flags instead.
pub struct Renderer {
    worker_count: usize,
    samplers: Vec<UniformSampler>,
    context: Option<SceneContext>,
}

impl Renderer {
    pub fn new(worker_count: usize) -> Self {
        assert!(worker_count > 0);
        Self {
            worker_count,
            samplers: (0..worker_count)
                .map(|i| UniformSampler::new(0, i as u64))
                .collect(),
            context: None,
        }
    }

    /// A renderer sized to the machine, capped at the fixed per-tile worker
    /// count the work distribution assumes.
    pub fn with_default_workers() -> Self {
        Self::new(num_cpus::get().min(6))
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Decodes and validates a new scene version. Skips the work if the
    /// generation matches the held context. Reseeds every worker's sampler
    /// from the scene seed so repeated renders of one scene version are
    /// reproducible.
    pub fn rebuild_scene(
        &mut self,
        sphere_bytes: &[u8],
        disc_bytes: &[u8],
        scene_bytes: &[u8],
        generation: u64,
    ) -> bool {
        if let Some(context) = &self.context {
            if context.generation == generation {
                tiletrace_debug!("Scene generation {} already built", generation);
                return true;
            }
        }

        match SceneContext::build(sphere_bytes, disc_bytes, scene_bytes, generation) {
            Ok(context) => {
                let seed = context.scene.rng_seed;
                for (i, sampler) in self.samplers.iter_mut().enumerate() {
                    sampler.reseed(seed, i as u64);
                }
                tiletrace_debug!(
                    "Built scene generation {} with {} geometries",
                    generation,
                    context.scene.geometry.len()
                );
                self.context = Some(context);
                true
            }
            Err(why) => {
                tiletrace_error!("Scene rebuild failed: {}", why);
                false
            }
        }
    }

    /// Initializes every ray slot's hit record with a fresh jittered camera
    /// ray. Accumulated colors are left alone.
    pub fn generate_rays(&mut self, rays: &mut [TraceResult]) -> bool {
        // Destructure for disjoint borrows of the context and the samplers
        let Self {
            worker_count,
            samplers,
            context,
        } = self;
        let Some(context) = context.as_ref() else {
            tiletrace_error!("Ray generation invoked without a scene");
            return false;
        };

        let partitions = strided_partitions(rays, *worker_count);
        std::thread::scope(|scope| {
            for (sampler, mut partition) in samplers.iter_mut().zip(partitions) {
                scope.spawn(move || {
                    generate_camera_rays(&mut partition, &context.scene, sampler);
                });
            }
        });
        true
    }

    /// Accumulates `sample_count` path-traced samples into every ray slot.
    pub fn path_trace(&mut self, rays: &mut [TraceResult], sample_count: u32) -> bool {
        let Self {
            worker_count,
            samplers,
            context,
        } = self;
        let Some(context) = context.as_ref() else {
            tiletrace_error!("Path trace invoked without a scene");
            return false;
        };
        if sample_count == 0 {
            tiletrace_warn!("Path trace invoked with a zero sample count");
            return true;
        }

        let partitions = strided_partitions(rays, *worker_count);
        std::thread::scope(|scope| {
            for (sampler, mut partition) in samplers.iter_mut().zip(partitions) {
                scope.spawn(move || {
                    path_trace_worker(context, sampler, &mut partition, sample_count);
                });
            }
        });
        true
    }

    /// Traces one primary hit plus one shadow ray per slot against a point
    /// light. Rays must have been initialized by [Self::generate_rays].
    pub fn shadow_trace(
        &self,
        ambient_light_factor: f32,
        light_pos: Vec3<f32>,
        rays: &mut [TraceResult],
    ) -> bool {
        let Some(context) = &self.context else {
            tiletrace_error!("Shadow trace invoked without a scene");
            return false;
        };

        let worker_count = self.worker_count;
        let partitions = strided_partitions(rays, worker_count);
        std::thread::scope(|scope| {
            for mut partition in partitions {
                scope.spawn(move || {
                    shadow_trace_worker(context, ambient_light_factor, light_pos, &mut partition);
                });
            }
        });
        true
    }

    /// Phase one of the escaped-ray protocol: fills `u` and `v` with
    /// environment lookup coordinates. Non-escaped rays get (0, 0).
    pub fn pre_process_escaped_rays(
        &self,
        rays: &[TraceResult],
        azimuth_rotation: f32,
        u: &mut [f32],
        v: &mut [f32],
    ) -> bool {
        if u.len() != rays.len() || v.len() != rays.len() {
            tiletrace_error!(
                "UV buffer sizes ({}, {}) do not match the ray count {}",
                u.len(),
                v.len(),
                rays.len()
            );
            return false;
        }

        let worker_count = self.worker_count;
        let u_partitions = strided_partitions(u, worker_count);
        let v_partitions = strided_partitions(v, worker_count);
        std::thread::scope(|scope| {
            for (worker, (u_partition, v_partition)) in
                u_partitions.into_iter().zip(v_partitions).enumerate()
            {
                scope.spawn(move || {
                    let worker_rays = rays.iter().skip(worker).step_by(worker_count);
                    for ((u_slot, v_slot), result) in
                        u_partition.into_iter().zip(v_partition).zip(worker_rays)
                    {
                        let (ray_u, ray_v) = resolve_uv(result, azimuth_rotation);
                        *u_slot = ray_u;
                        *v_slot = ray_v;
                    }
                });
            }
        });
        true
    }

    /// Phase two: folds externally sampled environment colors (BGR channel
    /// order, one triplet per ray) into the escaped rays' accumulated colors.
    pub fn post_process_escaped_rays(&self, rays: &mut [TraceResult], bgr: &[[f32; 3]]) -> bool {
        if bgr.len() != rays.len() {
            tiletrace_error!(
                "Environment sample count {} does not match the ray count {}",
                bgr.len(),
                rays.len()
            );
            return false;
        }

        let worker_count = self.worker_count;
        let partitions = strided_partitions(rays, worker_count);
        std::thread::scope(|scope| {
            for (worker, partition) in partitions.into_iter().enumerate() {
                scope.spawn(move || {
                    let worker_bgr = bgr.iter().skip(worker).step_by(worker_count);
                    for (result, sample) in partition.into_iter().zip(worker_bgr) {
                        apply_environment(result, *sample);
                    }
                });
            }
        });
        true
    }
}
