use crate::{
    bvh::{BvhNodeContent, CompactBvh, CompactBvhNode, TRAVERSAL_STACK_SIZE},
    materials::Material,
    math::{Ray, Vec3},
    serialization::Deserializer,
    shapes::{intersect_mesh, Disc, GeomRef, GeomType, MeshInfo, ShapeHit, Sphere, Triangle},
};

use std::error::Error;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// The rectangle of the full film this tile covers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CropWindow {
    pub w: i32,
    pub h: i32,
    pub c: i32,
    pub r: i32,
}

/// Everything a trace kernel needs to know about the scene, decoded into
/// owned buffers. Mesh data lives in unified buffers shared by all meshes,
/// with per-mesh ranges in `mesh_info`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneRef {
    pub geometry: Vec<GeomRef>,
    pub mesh_info: Vec<MeshInfo>,
    pub mesh_tris: Vec<Triangle>,
    pub mesh_verts: Vec<Vec3<f32>>,
    pub mesh_normals: Vec<Vec3<f32>>,
    pub mat_ids: Vec<u32>,
    pub materials: Vec<Material>,
    pub bvh_nodes: Vec<CompactBvhNode>,
    pub max_leaf_depth: u32,
    pub image_width: f32,
    pub image_height: f32,
    pub fov_radians: f32,
    pub anti_alias_scale: f32,
    pub max_path_length: u32,
    pub roulette_start_depth: u32,
    pub samples_per_pixel: u32,
    pub rng_seed: u64,
    pub window: CropWindow,
    pub path_trace: bool,
}

/// A validated, generation-tagged scene. Kernels borrow this for the duration
/// of a trace; a rebuild replaces the whole context.
pub struct SceneContext {
    pub generation: u64,
    pub scene: SceneRef,
    spheres: Vec<Sphere>,
    discs: Vec<Disc>,
}

impl SceneContext {
    /// Decodes the three transfer buffers and validates every cross-buffer
    /// reference so the trace kernels can index without checks.
    pub fn build(
        sphere_bytes: &[u8],
        disc_bytes: &[u8],
        scene_bytes: &[u8],
        generation: u64,
    ) -> Result<Self> {
        let spheres = Deserializer::new(sphere_bytes)?.read_array::<Sphere>()?;
        let discs = Deserializer::new(disc_bytes)?.read_array::<Disc>()?;
        let scene = Deserializer::new(scene_bytes)?.read::<SceneRef>()?;

        let context = Self {
            generation,
            scene,
            spheres,
            discs,
        };
        context.validate()?;
        Ok(context)
    }

    fn validate(&self) -> Result<()> {
        let scene = &self.scene;

        for (geom_id, geom) in scene.geometry.iter().enumerate() {
            let index = geom.index as usize;
            let count = match geom.kind {
                GeomType::Mesh => scene.mesh_info.len(),
                GeomType::Sphere => self.spheres.len(),
                GeomType::Disc => self.discs.len(),
            };
            if index >= count {
                return Err(format!(
                    "Geometry {} refers to {:?} {} of {}",
                    geom_id, geom.kind, index, count
                )
                .into());
            }
        }

        for (i, info) in scene.mesh_info.iter().enumerate() {
            let tri_end = info.first_index as usize + info.num_triangles as usize;
            let vert_end = info.first_vertex as usize + info.num_vertices as usize;
            if tri_end > scene.mesh_tris.len() {
                return Err(format!("Mesh {} triangle range overruns the index buffer", i).into());
            }
            if vert_end > scene.mesh_verts.len() {
                return Err(format!("Mesh {} vertex range overruns the vertex buffer", i).into());
            }
            if !scene.mesh_normals.is_empty() && vert_end > scene.mesh_normals.len() {
                return Err(format!("Mesh {} vertex range overruns the normal buffer", i).into());
            }
            let tris = &scene.mesh_tris[info.first_index as usize..tri_end];
            if tris
                .iter()
                .any(|t| t.v0.max(t.v1).max(t.v2) >= info.num_vertices)
            {
                return Err(format!("Mesh {} has out of range vertex indices", i).into());
            }
        }

        for (i, node) in scene.bvh_nodes.iter().enumerate() {
            match node.content {
                BvhNodeContent::Interior { second_child_index } => {
                    if second_child_index as usize >= scene.bvh_nodes.len() {
                        return Err(format!("BVH node {} has an out of range child", i).into());
                    }
                }
                BvhNodeContent::Leaf { geom_id, .. } => {
                    if geom_id as usize >= scene.geometry.len() {
                        return Err(
                            format!("BVH leaf {} refers to unknown geometry {}", i, geom_id).into()
                        );
                    }
                }
            }
        }

        let depth = self.bvh().max_leaf_depth();
        if depth > TRAVERSAL_STACK_SIZE {
            return Err(format!(
                "BVH depth {} exceeds the traversal stack capacity {}",
                depth, TRAVERSAL_STACK_SIZE
            )
            .into());
        }

        // Material ids are left unvalidated on purpose: a bad id is reported
        // per ray as an in-band shading error, not a rebuild failure
        Ok(())
    }

    pub fn bvh(&self) -> CompactBvh {
        CompactBvh {
            nodes: &self.scene.bvh_nodes,
        }
    }

    /// Tests the addressed primitive against `ray`. Indices are trusted here;
    /// they were validated when the context was built.
    pub fn intersect_prim(&self, geom_id: u16, prim_id: u32, ray: &Ray<f32>) -> Option<ShapeHit> {
        let geom = &self.scene.geometry[geom_id as usize];
        match geom.kind {
            GeomType::Sphere => self.spheres[geom.index as usize].intersect(ray),
            GeomType::Disc => self.discs[geom.index as usize].intersect(ray),
            GeomType::Mesh => {
                let info = &self.scene.mesh_info[geom.index as usize];
                let first_tri = info.first_index as usize;
                let first_vert = info.first_vertex as usize;
                let tris =
                    &self.scene.mesh_tris[first_tri..first_tri + info.num_triangles as usize];
                let verts =
                    &self.scene.mesh_verts[first_vert..first_vert + info.num_vertices as usize];
                let normals: &[Vec3<f32>] = if self.scene.mesh_normals.is_empty() {
                    &[]
                } else {
                    &self.scene.mesh_normals[first_vert..first_vert + info.num_vertices as usize]
                };
                // prim_id addresses the whole mesh; leaves are per geometry
                let _ = prim_id;
                intersect_mesh(info, tris, verts, normals, ray)
            }
        }
    }

    /// Looks up the material bound to a geometry. `None` marks the in-band
    /// shading error path.
    pub fn material_for(&self, geom_id: u16) -> Option<&Material> {
        let mat_id = *self.scene.mat_ids.get(geom_id as usize)?;
        self.scene.materials.get(mat_id as usize)
    }
}
