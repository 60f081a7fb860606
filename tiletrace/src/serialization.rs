//! Binary scene transfer format.
//!
//! Values are little-endian and aligned to their natural size; buffers are
//! padded to a 16-byte multiple. The reader side sits at a trust boundary:
//! every read is bounds-checked and decoded into owned values, and unknown
//! enum tags are errors.

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    bvh::{BvhNodeContent, CompactBvhNode},
    hit::INVALID_GEOM_ID,
    materials::{Material, MaterialKind},
    math::{Bounds3, Vec3},
    scene::{CropWindow, Result, SceneRef},
    shapes::{Disc, GeomRef, GeomType, MeshInfo, Sphere, Triangle},
};

/// Buffers are padded to this multiple.
pub const BUFFER_ALIGNMENT: usize = 16;

/// A type with a wire representation.
pub trait WireFormat: Sized {
    fn write(&self, s: &mut Serializer);
    fn read(d: &mut Deserializer) -> Result<Self>;
}

/// Appends aligned little-endian values into a growing buffer.
#[derive(Default)]
pub struct Serializer {
    buf: Vec<u8>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    fn align_to(&mut self, alignment: usize) {
        while self.buf.len() % alignment != 0 {
            self.buf.push(0);
        }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.align_to(2);
        let mut bytes = [0u8; 2];
        LittleEndian::write_u16(&mut bytes, v);
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.align_to(4);
        let mut bytes = [0u8; 4];
        LittleEndian::write_u32(&mut bytes, v);
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_u64(&mut self, v: u64) {
        self.align_to(8);
        let mut bytes = [0u8; 8];
        LittleEndian::write_u64(&mut bytes, v);
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_i32(&mut self, v: i32) {
        self.align_to(4);
        let mut bytes = [0u8; 4];
        LittleEndian::write_i32(&mut bytes, v);
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_f32(&mut self, v: f32) {
        self.align_to(4);
        let mut bytes = [0u8; 4];
        LittleEndian::write_f32(&mut bytes, v);
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write<T: WireFormat>(&mut self, v: &T) {
        v.write(self);
    }

    /// Writes a `u32` element count followed by the elements.
    pub fn write_array<T: WireFormat>(&mut self, items: &[T]) {
        self.write_u32(items.len() as u32);
        for item in items {
            item.write(self);
        }
    }

    /// Pads to the buffer alignment and returns the finished bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to(BUFFER_ALIGNMENT);
        self.buf
    }
}

/// Bounds-checked reader over a received buffer.
pub struct Deserializer<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Deserializer<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() % BUFFER_ALIGNMENT != 0 {
            return Err(format!(
                "Buffer length {} is not a multiple of {}",
                bytes.len(),
                BUFFER_ALIGNMENT
            )
            .into());
        }
        Ok(Self { bytes, cursor: 0 })
    }

    fn align_to(&mut self, alignment: usize) {
        while self.cursor % alignment != 0 {
            self.cursor += 1;
        }
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self
            .cursor
            .checked_add(count)
            .ok_or("Buffer cursor overflow")?;
        if end > self.bytes.len() {
            return Err(format!(
                "Read of {} bytes at offset {} overruns buffer of {} bytes",
                count,
                self.cursor,
                self.bytes.len()
            )
            .into());
        }
        let bytes = &self.bytes[self.cursor..end];
        self.cursor = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.align_to(2);
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.align_to(4);
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.align_to(8);
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.align_to(4);
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.align_to(4);
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn read<T: WireFormat>(&mut self) -> Result<T> {
        T::read(self)
    }

    pub fn read_array<T: WireFormat>(&mut self) -> Result<Vec<T>> {
        let count = self.read_u32()? as usize;
        let mut items = Vec::with_capacity(count.min(self.bytes.len()));
        for _ in 0..count {
            items.push(T::read(self)?);
        }
        Ok(items)
    }
}

impl WireFormat for u32 {
    fn write(&self, s: &mut Serializer) {
        s.write_u32(*self);
    }

    fn read(d: &mut Deserializer) -> Result<Self> {
        d.read_u32()
    }
}

impl WireFormat for Vec3<f32> {
    fn write(&self, s: &mut Serializer) {
        s.write_f32(self.x);
        s.write_f32(self.y);
        s.write_f32(self.z);
    }

    fn read(d: &mut Deserializer) -> Result<Self> {
        let x = d.read_f32()?;
        let y = d.read_f32()?;
        let z = d.read_f32()?;
        Ok(Self { x, y, z })
    }
}

impl WireFormat for GeomRef {
    fn write(&self, s: &mut Serializer) {
        s.write_u16(self.index);
        s.write_u8(self.kind as u8);
    }

    fn read(d: &mut Deserializer) -> Result<Self> {
        let index = d.read_u16()?;
        let tag = d.read_u8()?;
        let kind =
            GeomType::from_tag(tag).ok_or_else(|| format!("Unknown geometry tag {}", tag))?;
        Ok(Self { index, kind })
    }
}

impl WireFormat for MeshInfo {
    fn write(&self, s: &mut Serializer) {
        s.write_u32(self.first_index);
        s.write_u32(self.num_triangles);
        s.write_u32(self.first_vertex);
        s.write_u32(self.num_vertices);
    }

    fn read(d: &mut Deserializer) -> Result<Self> {
        Ok(Self {
            first_index: d.read_u32()?,
            num_triangles: d.read_u32()?,
            first_vertex: d.read_u32()?,
            num_vertices: d.read_u32()?,
        })
    }
}

impl WireFormat for Triangle {
    fn write(&self, s: &mut Serializer) {
        s.write_u32(self.v0);
        s.write_u32(self.v1);
        s.write_u32(self.v2);
    }

    fn read(d: &mut Deserializer) -> Result<Self> {
        Ok(Self {
            v0: d.read_u32()?,
            v1: d.read_u32()?,
            v2: d.read_u32()?,
        })
    }
}

impl WireFormat for Material {
    fn write(&self, s: &mut Serializer) {
        s.write_u32(self.kind as u32);
        s.write_u8(self.emissive as u8);
        s.write(&self.albedo);
        s.write_f32(self.ior);
        s.write(&self.emission);
    }

    fn read(d: &mut Deserializer) -> Result<Self> {
        let tag = d.read_u32()?;
        let kind =
            MaterialKind::from_tag(tag).ok_or_else(|| format!("Unknown material tag {}", tag))?;
        let emissive = d.read_u8()? != 0;
        let albedo = d.read()?;
        let ior = d.read_f32()?;
        let emission = d.read()?;
        Ok(Self {
            kind,
            emissive,
            albedo,
            ior,
            emission,
        })
    }
}

// Interior nodes reuse the leaf layout with the invalid geometry id as the
// discriminant and the child index in the primitive slot
impl WireFormat for CompactBvhNode {
    fn write(&self, s: &mut Serializer) {
        s.write(&self.bounds.p_min);
        s.write(&self.bounds.p_max);
        match self.content {
            BvhNodeContent::Interior { second_child_index } => {
                s.write_u16(INVALID_GEOM_ID);
                s.write_u32(second_child_index);
            }
            BvhNodeContent::Leaf { geom_id, prim_id } => {
                s.write_u16(geom_id);
                s.write_u32(prim_id);
            }
        }
    }

    fn read(d: &mut Deserializer) -> Result<Self> {
        let p_min = d.read()?;
        let p_max = d.read()?;
        let geom_id = d.read_u16()?;
        let payload = d.read_u32()?;
        let content = if geom_id == INVALID_GEOM_ID {
            BvhNodeContent::Interior {
                second_child_index: payload,
            }
        } else {
            BvhNodeContent::Leaf {
                geom_id,
                prim_id: payload,
            }
        };
        Ok(Self {
            bounds: Bounds3::new(p_min, p_max),
            content,
        })
    }
}

impl WireFormat for Sphere {
    fn write(&self, s: &mut Serializer) {
        s.write(&self.center);
        s.write_f32(self.radius);
    }

    fn read(d: &mut Deserializer) -> Result<Self> {
        let center = d.read()?;
        let radius = d.read_f32()?;
        Ok(Self { center, radius })
    }
}

impl WireFormat for Disc {
    fn write(&self, s: &mut Serializer) {
        s.write(&self.normal);
        s.write(&self.center);
        s.write_f32(self.radius);
    }

    fn read(d: &mut Deserializer) -> Result<Self> {
        let normal = d.read()?;
        let center = d.read()?;
        let radius = d.read_f32()?;
        Ok(Self {
            normal,
            center,
            radius,
        })
    }
}

impl WireFormat for CropWindow {
    fn write(&self, s: &mut Serializer) {
        s.write_i32(self.w);
        s.write_i32(self.h);
        s.write_i32(self.c);
        s.write_i32(self.r);
    }

    fn read(d: &mut Deserializer) -> Result<Self> {
        Ok(Self {
            w: d.read_i32()?,
            h: d.read_i32()?,
            c: d.read_i32()?,
            r: d.read_i32()?,
        })
    }
}

impl WireFormat for SceneRef {
    fn write(&self, s: &mut Serializer) {
        s.write_array(&self.geometry);
        s.write_array(&self.mesh_info);
        s.write_array(&self.mesh_tris);
        s.write_array(&self.mesh_verts);
        s.write_array(&self.mesh_normals);
        s.write_array(&self.mat_ids);
        s.write_array(&self.materials);
        s.write_array(&self.bvh_nodes);
        s.write_u32(self.max_leaf_depth);
        s.write_f32(self.image_width);
        s.write_f32(self.image_height);
        s.write_f32(self.fov_radians);
        s.write_f32(self.anti_alias_scale);
        s.write_u32(self.max_path_length);
        s.write_u32(self.roulette_start_depth);
        s.write_u32(self.samples_per_pixel);
        s.write_u64(self.rng_seed);
        s.write(&self.window);
        s.write_u8(self.path_trace as u8);
    }

    fn read(d: &mut Deserializer) -> Result<Self> {
        Ok(Self {
            geometry: d.read_array()?,
            mesh_info: d.read_array()?,
            mesh_tris: d.read_array()?,
            mesh_verts: d.read_array()?,
            mesh_normals: d.read_array()?,
            mat_ids: d.read_array()?,
            materials: d.read_array()?,
            bvh_nodes: d.read_array()?,
            max_leaf_depth: d.read_u32()?,
            image_width: d.read_f32()?,
            image_height: d.read_f32()?,
            fov_radians: d.read_f32()?,
            anti_alias_scale: d.read_f32()?,
            max_path_length: d.read_u32()?,
            roulette_start_depth: d.read_u32()?,
            samples_per_pixel: d.read_u32()?,
            rng_seed: d.read_u64()?,
            window: d.read()?,
            path_trace: d.read_u8()? != 0,
        })
    }
}
