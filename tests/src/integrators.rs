#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use tiletrace::{
        hit::{HitFlags, HitRecord, PixelCoord, TraceResult},
        materials::Material,
        math::Vec3,
        renderer::Renderer,
        shapes::{Disc, Sphere},
    };

    use crate::fixtures::SceneBuilder;

    fn pixel_grid(width: u32, height: u32) -> Vec<TraceResult> {
        let mut rays = Vec::with_capacity((width * height) as usize);
        for row in 0..height {
            for col in 0..width {
                rays.push(TraceResult::new(PixelCoord::new(row, col)));
            }
        }
        rays
    }

    /// A black-albedo emissive sphere terminates every path at the first
    /// hit, so the estimator has zero variance and the accumulated color is
    /// exactly samples x emission.
    #[test]
    fn emissive_sphere_accumulates_exact_emission() {
        let emission = Vec3::new(2.0, 3.0, 4.0);
        let mut builder = SceneBuilder::default();
        builder
            .spheres
            .push(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 2.0));
        builder.mat_ids = vec![0];
        builder.materials = vec![Material::diffuse(Vec3::zeros()).with_emission(emission)];
        builder.image_width = 4.0;
        builder.image_height = 4.0;
        let (sphere_bytes, disc_bytes, scene_bytes) = builder.build();

        let mut renderer = Renderer::new(2);
        assert!(renderer.rebuild_scene(&sphere_bytes, &disc_bytes, &scene_bytes, 1));

        let mut rays = pixel_grid(4, 4);
        let sample_count = 16;
        assert!(renderer.path_trace(&mut rays, sample_count));

        // Center pixels look at the sphere head-on
        let center = &rays[4 + 1]; // row 1, col 1
        let average = center.rgb / sample_count as f32;
        assert_abs_diff_eq!(average.x, emission.x, epsilon = 1e-4);
        assert_abs_diff_eq!(average.y, emission.y, epsilon = 1e-4);
        assert_abs_diff_eq!(average.z, emission.z, epsilon = 1e-4);
    }

    #[test]
    fn escaped_rays_are_flagged_and_black() {
        let mut builder = SceneBuilder::default();
        builder
            .spheres
            .push(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 0.1));
        builder.mat_ids = vec![0];
        builder.materials =
            vec![Material::diffuse(Vec3::zeros()).with_emission(Vec3::ones())];
        builder.image_width = 4.0;
        builder.image_height = 4.0;
        let (sphere_bytes, disc_bytes, scene_bytes) = builder.build();

        let mut renderer = Renderer::new(2);
        assert!(renderer.rebuild_scene(&sphere_bytes, &disc_bytes, &scene_bytes, 1));

        let mut rays = pixel_grid(4, 4);
        assert!(renderer.path_trace(&mut rays, 1));

        // The corner pixel is ~50 degrees off axis and cannot hit the tiny
        // sphere
        let corner = &rays[0];
        assert!(corner.h.flags.contains(HitFlags::ESCAPED));
        assert_eq!(corner.rgb, Vec3::zeros());
    }

    #[test]
    fn path_trace_output_is_finite_and_nonzero() {
        // A camera ray aimed straight at an emissive sphere accumulates its
        // emission on the first bounce and terminates soon after
        let mut builder = SceneBuilder::default();
        builder
            .spheres
            .push(Sphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0));
        builder.mat_ids = vec![0];
        builder.materials = vec![
            Material::diffuse(Vec3::new(0.5, 0.5, 0.5)).with_emission(Vec3::new(1.0, 1.0, 1.0)),
        ];
        builder.image_width = 1.0;
        builder.image_height = 1.0;
        builder.max_path_length = 6;
        let (sphere_bytes, disc_bytes, scene_bytes) = builder.build();

        let mut renderer = Renderer::new(1);
        assert!(renderer.rebuild_scene(&sphere_bytes, &disc_bytes, &scene_bytes, 7));

        let mut rays = pixel_grid(1, 1);
        let sample_count = 32;
        assert!(renderer.path_trace(&mut rays, sample_count));

        for ray in &rays {
            assert!(
                ray.rgb.x.is_finite() && ray.rgb.y.is_finite() && ray.rgb.z.is_finite(),
                "accumulated color must be finite: {:?}",
                ray.rgb
            );
            // Every pixel direction hits the sphere here, so at least the
            // first-hit emission must have accumulated each sample
            assert!(ray.rgb.x >= sample_count as f32);
        }
    }

    #[test]
    fn rebuild_is_skipped_for_same_generation() {
        let mut builder = SceneBuilder::default();
        builder
            .spheres
            .push(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0));
        builder.mat_ids = vec![0];
        builder.materials = vec![Material::diffuse(Vec3::new(0.5, 0.5, 0.5))];
        let (sphere_bytes, disc_bytes, scene_bytes) = builder.build();

        let mut renderer = Renderer::new(2);
        assert!(renderer.rebuild_scene(&sphere_bytes, &disc_bytes, &scene_bytes, 3));
        // Same generation: buffers are not even looked at
        assert!(renderer.rebuild_scene(&[], &[], &[], 3));
        // New generation with bad buffers fails
        assert!(!renderer.rebuild_scene(&[1u8; 8], &[], &[], 4));
    }

    fn shadow_scene(with_occluder: bool) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        let mut builder = SceneBuilder::default();
        if with_occluder {
            builder
                .spheres
                .push(Sphere::new(Vec3::new(1.5, 0.0, 2.5), 0.5));
        }
        builder.discs.push(Disc::new(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 4.0),
            2.0,
        ));
        let albedo = Vec3::new(0.8, 0.6, 0.4);
        let geom_count = builder.spheres.len() + builder.discs.len();
        builder.mat_ids = vec![0; geom_count];
        builder.materials = vec![Material::diffuse(albedo)];
        builder.build()
    }

    #[test]
    fn shadow_trace_lit_and_occluded() {
        let albedo = Vec3::new(0.8, 0.6, 0.4);
        let ambient = 0.1;
        let light_pos = Vec3::new(3.0, 0.0, 1.0);

        let trace = |with_occluder: bool| -> Vec3<f32> {
            let (sphere_bytes, disc_bytes, scene_bytes) = shadow_scene(with_occluder);
            let mut renderer = Renderer::new(2);
            assert!(renderer.rebuild_scene(&sphere_bytes, &disc_bytes, &scene_bytes, 1));

            let mut rays = vec![TraceResult::new(PixelCoord::new(0, 0))];
            rays[0].h = HitRecord::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
            assert!(renderer.shadow_trace(ambient, light_pos, &mut rays));
            rays[0].rgb
        };

        // Lit: ambient plus the cosine-weighted direct term
        let hit_point = Vec3::new(0.0, 0.0, 4.0);
        let light_dir = (light_pos - hit_point).normalized();
        let cos = Vec3::new(0.0, 0.0, -1.0).dot(light_dir);
        let lit = trace(false);
        assert_abs_diff_eq!(lit.x, albedo.x * (ambient + cos), epsilon = 1e-3);
        assert_abs_diff_eq!(lit.y, albedo.y * (ambient + cos), epsilon = 1e-3);
        assert_abs_diff_eq!(lit.z, albedo.z * (ambient + cos), epsilon = 1e-3);

        // Occluded: only the ambient term survives
        let occluded = trace(true);
        assert_abs_diff_eq!(occluded.x, albedo.x * ambient, epsilon = 1e-3);
        assert_abs_diff_eq!(occluded.y, albedo.y * ambient, epsilon = 1e-3);
        assert_abs_diff_eq!(occluded.z, albedo.z * ambient, epsilon = 1e-3);
    }

    #[test]
    fn shadow_trace_flags_misses_as_escaped() {
        let (sphere_bytes, disc_bytes, scene_bytes) = shadow_scene(false);
        let mut renderer = Renderer::new(1);
        assert!(renderer.rebuild_scene(&sphere_bytes, &disc_bytes, &scene_bytes, 1));

        let mut rays = vec![TraceResult::new(PixelCoord::new(0, 0))];
        rays[0].h = HitRecord::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        assert!(renderer.shadow_trace(0.1, Vec3::new(0.0, 5.0, 0.0), &mut rays));
        assert!(rays[0].h.flags.contains(HitFlags::ESCAPED));
        assert_eq!(rays[0].rgb, Vec3::zeros());
    }
}
