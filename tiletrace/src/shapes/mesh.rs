use super::ShapeHit;
use crate::math::{Ray, Vec3};

/// One triangle as indices into a mesh's local vertex range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub v0: u32,
    pub v1: u32,
    pub v2: u32,
}

/// Offsets and counts locating one mesh's triangle, vertex and normal ranges
/// inside the scene's shared unified buffers. Triangle indices are local to
/// the mesh's vertex range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeshInfo {
    pub first_index: u32,
    pub num_triangles: u32,
    pub first_vertex: u32,
    pub num_vertices: u32,
}

/// Finds the nearest triangle intersection inside the mesh's range.
///
/// `normals` may be empty, in which case the geometric normal is used;
/// otherwise the per-vertex normals are interpolated barycentrically.
/// The slices are the mesh's own ranges, already carved out of the unified
/// buffers.
pub fn intersect_mesh(
    info: &MeshInfo,
    tris: &[Triangle],
    verts: &[Vec3<f32>],
    normals: &[Vec3<f32>],
    ray: &Ray<f32>,
) -> Option<ShapeHit> {
    debug_assert!(tris.len() == info.num_triangles as usize);
    debug_assert!(verts.len() == info.num_vertices as usize);

    let mut nearest: Option<ShapeHit> = None;
    let mut t_max = ray.t_max;
    for tri in tris {
        if let Some(hit) = intersect_triangle(tri, verts, normals, ray, t_max) {
            t_max = hit.t;
            nearest = Some(hit);
        }
    }
    nearest
}

// Möller-Trumbore test against a single triangle
fn intersect_triangle(
    tri: &Triangle,
    verts: &[Vec3<f32>],
    normals: &[Vec3<f32>],
    ray: &Ray<f32>,
    t_max: f32,
) -> Option<ShapeHit> {
    let p0 = verts[tri.v0 as usize];
    let p1 = verts[tri.v1 as usize];
    let p2 = verts[tri.v2 as usize];

    let e1 = p1 - p0;
    let e2 = p2 - p0;
    let p_vec = ray.d.cross(e2);
    let det = e1.dot(p_vec);
    if det.abs() < 1e-9 {
        // Ray parallel to the triangle plane
        return None;
    }
    let inv_det = 1.0 / det;

    let t_vec = ray.o - p0;
    let u = t_vec.dot(p_vec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q_vec = t_vec.cross(e1);
    let v = ray.d.dot(q_vec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(q_vec) * inv_det;
    if t <= ray.t_min || t > t_max {
        return None;
    }

    let normal = if normals.is_empty() {
        e1.cross(e2).normalized()
    } else {
        let n0 = normals[tri.v0 as usize];
        let n1 = normals[tri.v1 as usize];
        let n2 = normals[tri.v2 as usize];
        (n0 * (1.0 - u - v) + n1 * u + n2 * v).normalized()
    };

    Some(ShapeHit { t, normal })
}
