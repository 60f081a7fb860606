use bitflags::bitflags;

use crate::math::{Ray, Vec3};

/// Sentinel for "no geometry": the maximum representable id.
pub const INVALID_GEOM_ID: u16 = u16::MAX;
/// Sentinel for "no primitive": the maximum representable id.
pub const INVALID_PRIM_ID: u32 = u32::MAX;

bitflags! {
    /// Terminal per-ray conditions, communicated in-band to downstream stages.
    ///
    /// Flags are only ever set during a path and reset explicitly when the ray
    /// is regenerated for the next sample.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct HitFlags: u16 {
        /// An unrecoverable shading condition was hit; the result color is
        /// poisoned with NaN.
        const ERROR = 1;
        /// The ray left the scene and awaits an environment lookup.
        const ESCAPED = 2;
    }
}

/// Pixel coordinates a trace result belongs to, stored as floats so jittered
/// sample offsets can be applied directly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PixelCoord {
    pub row: f32,
    pub col: f32,
}

impl PixelCoord {
    pub fn new(row: u32, col: u32) -> Self {
        Self {
            row: row as f32,
            col: col as f32,
        }
    }
}

impl Default for PixelCoord {
    /// Constructs (deliberately) invalid pixel coords
    fn default() -> Self {
        Self {
            row: -f32::INFINITY,
            col: -f32::INFINITY,
        }
    }
}

/// Per-ray tracing state: the ray itself plus the most recent surface hit and
/// the accumulated path throughput.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitRecord {
    pub r: Ray<f32>,
    pub prim_id: u32,
    pub normal: Vec3<f32>,
    pub throughput: Vec3<f32>,
    pub geom_id: u16,
    pub flags: HitFlags,
}

impl HitRecord {
    pub fn new(origin: Vec3<f32>, dir: Vec3<f32>) -> Self {
        Self {
            r: Ray::new(origin, dir),
            prim_id: INVALID_PRIM_ID,
            // Match Embree init
            normal: Vec3::new(0.0, 0.0, 1.0),
            throughput: Vec3::ones(),
            geom_id: INVALID_GEOM_ID,
            flags: HitFlags::empty(),
        }
    }

    pub fn clear_flags(&mut self) {
        self.flags = HitFlags::empty();
    }
}

impl Default for HitRecord {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0))
    }
}

/// One slot in the ray stream. Persists across repeated kernel invocations so
/// the color field accumulates: camera generation, trace, and escaped-ray
/// resolution all add into `rgb`, never overwrite it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TraceResult {
    pub rgb: Vec3<f32>,
    pub p: PixelCoord,
    pub h: HitRecord,
}

impl TraceResult {
    pub fn new(p: PixelCoord) -> Self {
        Self {
            rgb: Vec3::zeros(),
            p,
            h: HitRecord::default(),
        }
    }
}
