#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand_pcg::Pcg32;

    use tiletrace::{
        materials::Material,
        math::{Ray, Vec3},
        scene::SceneContext,
        shapes::{Disc, ShapeHit, Sphere, Triangle},
    };

    use crate::fixtures::{MeshData, SceneBuilder};

    fn random_point(rng: &mut Pcg32, extent: f32) -> Vec3<f32> {
        Vec3::new(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        )
    }

    fn random_dir(rng: &mut Pcg32) -> Vec3<f32> {
        loop {
            let d = random_point(rng, 1.0);
            let len = d.len();
            if len > 1e-3 && len <= 1.0 {
                return d / len;
            }
        }
    }

    fn random_scene(rng: &mut Pcg32, prim_count: usize) -> SceneBuilder {
        let mut builder = SceneBuilder::default();
        for _ in 0..prim_count {
            match rng.gen_range(0..3) {
                0 => builder.spheres.push(Sphere::new(
                    random_point(rng, 10.0),
                    rng.gen_range(0.2..1.5),
                )),
                1 => builder.discs.push(Disc::new(
                    random_dir(rng),
                    random_point(rng, 10.0),
                    rng.gen_range(0.2..1.5),
                )),
                _ => {
                    let v0 = random_point(rng, 10.0);
                    let v1 = v0 + random_point(rng, 2.0);
                    let v2 = v0 + random_point(rng, 2.0);
                    builder.meshes.push(MeshData {
                        tris: vec![Triangle { v0: 0, v1: 1, v2: 2 }],
                        verts: vec![v0, v1, v2],
                        normals: vec![],
                    });
                }
            }
        }
        let geom_count = builder.meshes.len() + builder.spheres.len() + builder.discs.len();
        builder.mat_ids = vec![0; geom_count];
        builder.materials = vec![Material::diffuse(Vec3::new(0.5, 0.5, 0.5))];
        builder
    }

    /// Nearest hit over an exhaustive scan of every geometry.
    fn brute_force_closest(context: &SceneContext, ray: &Ray<f32>) -> Option<ShapeHit> {
        let mut clipped = *ray;
        let mut nearest = None;
        for geom_id in 0..context.scene.geometry.len() {
            if let Some(hit) = context.intersect_prim(geom_id as u16, 0, &clipped) {
                clipped.t_max = hit.t;
                nearest = Some(hit);
            }
        }
        nearest
    }

    #[test]
    fn traversal_matches_brute_force() {
        let mut rng = Pcg32::new(0x1234_5678, 0);

        // Several scene sizes to cover different tree depths
        for &prim_count in &[1usize, 2, 5, 17, 60, 150] {
            let builder = random_scene(&mut rng, prim_count);
            let (sphere_bytes, disc_bytes, scene_bytes) = builder.build();
            let context = SceneContext::build(&sphere_bytes, &disc_bytes, &scene_bytes, 1)
                .expect("scene should build");
            let bvh = context.bvh();

            for _ in 0..200 {
                let mut ray = Ray::new(random_point(&mut rng, 12.0), random_dir(&mut rng));
                let expected = brute_force_closest(&context, &ray);
                let found = bvh.intersect(&mut ray, |geom_id, prim_id, r| {
                    context.intersect_prim(geom_id, prim_id, r)
                });

                match (expected, found) {
                    (None, None) => (),
                    (Some(e), Some(f)) => {
                        assert!(
                            (e.t - f.t).abs() <= 1e-3 * e.t.max(1.0),
                            "t mismatch: brute force {} vs traversal {} ({} prims)",
                            e.t,
                            f.t,
                            prim_count
                        );
                    }
                    (e, f) => panic!(
                        "hit disagreement: brute force {:?} vs traversal {:?} ({} prims)",
                        e.map(|h| h.t),
                        f.map(|h| h.t),
                        prim_count
                    ),
                }
            }
        }
    }

    #[test]
    fn traversal_respects_ray_interval() {
        let mut builder = SceneBuilder::default();
        builder
            .spheres
            .push(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0));
        builder.mat_ids = vec![0];
        builder.materials = vec![Material::diffuse(Vec3::new(0.5, 0.5, 0.5))];
        let (sphere_bytes, disc_bytes, scene_bytes) = builder.build();
        let context = SceneContext::build(&sphere_bytes, &disc_bytes, &scene_bytes, 1).unwrap();

        let mut ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        ray.t_max = 3.0; // Sphere front face is at t = 4
        let hit = context.bvh().intersect(&mut ray, |geom_id, prim_id, r| {
            context.intersect_prim(geom_id, prim_id, r)
        });
        assert!(hit.is_none());
    }

    #[test]
    fn any_intersect_finds_occluders() {
        let mut builder = SceneBuilder::default();
        builder
            .spheres
            .push(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0));
        builder.mat_ids = vec![0];
        builder.materials = vec![Material::diffuse(Vec3::new(0.5, 0.5, 0.5))];
        let (sphere_bytes, disc_bytes, scene_bytes) = builder.build();
        let context = SceneContext::build(&sphere_bytes, &disc_bytes, &scene_bytes, 1).unwrap();
        let bvh = context.bvh();

        let toward = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        assert!(bvh.any_intersect(&toward, |g, p, r| context.intersect_prim(g, p, r)));

        let away = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        assert!(!bvh.any_intersect(&away, |g, p, r| context.intersect_prim(g, p, r)));
    }
}
