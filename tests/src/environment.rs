#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use tiletrace::{
        hit::{HitFlags, PixelCoord, TraceResult},
        math::Vec3,
        renderer::Renderer,
    };

    fn ray_batch(count: u32) -> Vec<TraceResult> {
        (0..count)
            .map(|i| TraceResult::new(PixelCoord::new(0, i)))
            .collect()
    }

    #[test]
    fn pre_process_zeroes_non_escaped_rays() {
        let renderer = Renderer::new(3);
        let mut rays = ray_batch(7);
        // Give the rays junk directions; only the flag should matter
        for (i, ray) in rays.iter_mut().enumerate() {
            ray.h.r.d = Vec3::new(0.1 + i as f32, -0.4, 0.8).normalized();
        }
        rays[2].h.flags = HitFlags::ESCAPED;
        rays[5].h.flags = HitFlags::ESCAPED;

        let mut u = vec![-1.0f32; rays.len()];
        let mut v = vec![-1.0f32; rays.len()];
        assert!(renderer.pre_process_escaped_rays(&rays, 0.4, &mut u, &mut v));

        for (i, (u, v)) in u.iter().zip(&v).enumerate() {
            if i == 2 || i == 5 {
                assert!((0.0..=1.0).contains(u));
                assert!((0.0..1.0).contains(v));
            } else {
                assert_eq!((*u, *v), (0.0, 0.0), "ray {} should be zeroed", i);
            }
        }
    }

    #[test]
    fn pre_process_rejects_mismatched_buffers() {
        let renderer = Renderer::new(2);
        let rays = ray_batch(4);
        let mut u = vec![0.0f32; 3];
        let mut v = vec![0.0f32; 4];
        assert!(!renderer.pre_process_escaped_rays(&rays, 0.0, &mut u, &mut v));
    }

    #[test]
    fn post_process_adds_weighted_color_to_escaped_rays_only() {
        let renderer = Renderer::new(2);
        let mut rays = ray_batch(4);
        rays[1].h.flags = HitFlags::ESCAPED;
        rays[1].h.throughput = Vec3::new(0.5, 0.5, 0.5);
        rays[1].rgb = Vec3::new(1.0, 0.0, 0.0);

        let bgr = vec![[2.0f32, 4.0, 6.0]; 4];
        assert!(renderer.post_process_escaped_rays(&mut rays, &bgr));

        // BGR flips to RGB before weighting
        assert_abs_diff_eq!(rays[1].rgb.x, 1.0 + 0.5 * 6.0);
        assert_abs_diff_eq!(rays[1].rgb.y, 0.5 * 4.0);
        assert_abs_diff_eq!(rays[1].rgb.z, 0.5 * 2.0);
        for i in [0usize, 2, 3] {
            assert_eq!(rays[i].rgb, Vec3::zeros());
        }
    }

    #[test]
    fn post_process_rejects_mismatched_buffers() {
        let renderer = Renderer::new(2);
        let mut rays = ray_batch(4);
        let bgr = vec![[0.0f32; 3]; 3];
        assert!(!renderer.post_process_escaped_rays(&mut rays, &bgr));
    }
}
