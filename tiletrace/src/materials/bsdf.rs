use crate::{math::Vec3, sampling::cosine_sample_hemisphere};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Specular_Reflection_and_Transmission

/// Mirror reflection of `d` about the surface normal `n`.
pub fn reflect(d: Vec3<f32>, n: Vec3<f32>) -> Vec3<f32> {
    d - n * (2.0 * d.dot(n))
}

/// Draws a cosine-weighted outgoing direction in the hemisphere about `n`.
///
/// The cosine and PDF terms cancel analytically for cosine-weighted sampling,
/// so callers only multiply throughput by albedo.
pub fn sample_diffuse(n: Vec3<f32>, u1: f32, u2: f32) -> Vec3<f32> {
    let local = cosine_sample_hemisphere(u1, u2);
    let (tangent, bitangent) = n.orthonormal_basis();
    (tangent * local.x + bitangent * local.y + n * local.z).normalized()
}

/// Samples a dielectric interface: reflects or refracts the incoming
/// direction `d` at a surface with normal `n` and index of refraction `ior`,
/// deciding stochastically from the Fresnel reflectance and the uniform
/// sample `u1`.
///
/// Returns the outgoing direction and whether the refraction branch was
/// taken (throughput attenuation by albedo applies only to refraction).
pub fn sample_dielectric(d: Vec3<f32>, n: Vec3<f32>, ior: f32, u1: f32) -> (Vec3<f32>, bool) {
    let entering = d.dot(n) < 0.0;
    // Normal on the incoming side
    let nl = if entering { n } else { -n };
    let (eta_i, eta_t) = if entering { (1.0, ior) } else { (ior, 1.0) };
    let eta = eta_i / eta_t;

    let cos_theta_i = d.dot(nl).abs().min(1.0);

    // Snell's law
    let sin2_theta_t = eta * eta * (1.0 - cos_theta_i * cos_theta_i);
    if sin2_theta_t >= 1.0 {
        // Total internal reflection
        return (reflect(d, nl), false);
    }
    let cos_theta_t = (1.0 - sin2_theta_t).sqrt();

    let r_parallel = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
        / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perpendicular = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
        / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
    let fresnel = (r_parallel * r_parallel + r_perpendicular * r_perpendicular) / 2.0;

    if u1 < fresnel {
        (reflect(d, nl), false)
    } else {
        let refracted = (d * eta + nl * (eta * cos_theta_i - cos_theta_t)).normalized();
        (refracted, true)
    }
}
