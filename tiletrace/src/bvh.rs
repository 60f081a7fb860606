use crate::{
    hit::{INVALID_GEOM_ID, INVALID_PRIM_ID},
    math::{Bounds3, Ray, Vec3},
    shapes::ShapeHit,
};

/// Fixed traversal stack capacity. Trees deeper than this are rejected when
/// the scene context is built.
pub const TRAVERSAL_STACK_SIZE: usize = 64;

/// What a flattened node refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BvhNodeContent {
    /// The first child is the next node in the array, the second child is at
    /// the stored index.
    Interior { second_child_index: u32 },
    /// A single primitive, addressed by geometry and primitive index.
    Leaf { geom_id: u16, prim_id: u32 },
}

/// One node of the flattened tree. Interior nodes are stored in depth-first
/// order with the first child immediately following its parent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CompactBvhNode {
    pub bounds: Bounds3<f32>,
    pub content: BvhNodeContent,
}

impl CompactBvhNode {
    pub fn interior(bounds: Bounds3<f32>, second_child_index: u32) -> Self {
        Self {
            bounds,
            content: BvhNodeContent::Interior { second_child_index },
        }
    }

    pub fn leaf(bounds: Bounds3<f32>, geom_id: u16, prim_id: u32) -> Self {
        Self {
            bounds,
            content: BvhNodeContent::Leaf { geom_id, prim_id },
        }
    }
}

/// The nearest accepted primitive hit found by a traversal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    pub t: f32,
    pub normal: Vec3<f32>,
    pub geom_id: u16,
    pub prim_id: u32,
}

/// A borrowed view of a flattened two-wide BVH.
pub struct CompactBvh<'a> {
    pub nodes: &'a [CompactBvhNode],
}

impl CompactBvh<'_> {
    /// Finds the closest hit within `ray`'s interval, tightening `ray.t_max`
    /// as hits are accepted.
    ///
    /// `prim_intersect` tests one primitive and returns the accepted hit
    /// within the ray's current interval, if any.
    pub fn intersect(
        &self,
        ray: &mut Ray<f32>,
        mut prim_intersect: impl FnMut(u16, u32, &Ray<f32>) -> Option<ShapeHit>,
    ) -> Option<Intersection> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut nearest = Intersection {
            t: ray.t_max,
            normal: Vec3::new(0.0, 0.0, 1.0),
            geom_id: INVALID_GEOM_ID,
            prim_id: INVALID_PRIM_ID,
        };
        let mut found = false;

        let mut to_visit = [0usize; TRAVERSAL_STACK_SIZE];
        let mut to_visit_count = 0usize;
        let mut node_index = 0usize;
        loop {
            let node = &self.nodes[node_index];
            match node.content {
                BvhNodeContent::Interior { second_child_index } => {
                    let first = node_index + 1;
                    let second = second_child_index as usize;
                    let hit_first = self.nodes[first].bounds.intersections(*ray);
                    let hit_second = self.nodes[second].bounds.intersections(*ray);
                    match (hit_first, hit_second) {
                        (Some((t_first, _)), Some((t_second, _))) => {
                            // Visit the nearer child first, ties keep order
                            let (near, far) = if t_second < t_first {
                                (second, first)
                            } else {
                                (first, second)
                            };
                            debug_assert!(to_visit_count < TRAVERSAL_STACK_SIZE);
                            to_visit[to_visit_count] = far;
                            to_visit_count += 1;
                            node_index = near;
                            continue;
                        }
                        (Some(_), None) => {
                            node_index = first;
                            continue;
                        }
                        (None, Some(_)) => {
                            node_index = second;
                            continue;
                        }
                        (None, None) => (),
                    }
                }
                BvhNodeContent::Leaf { geom_id, prim_id } => {
                    if node.bounds.intersections(*ray).is_some() {
                        if let Some(hit) = prim_intersect(geom_id, prim_id, ray) {
                            ray.t_max = hit.t;
                            nearest = Intersection {
                                t: hit.t,
                                normal: hit.normal,
                                geom_id,
                                prim_id,
                            };
                            found = true;
                        }
                    }
                }
            }

            if to_visit_count == 0 {
                break;
            }
            to_visit_count -= 1;
            node_index = to_visit[to_visit_count];
        }

        found.then_some(nearest)
    }

    /// Returns `true` if any primitive intersects `ray`'s interval. Exits on
    /// the first accepted hit without ordering children.
    pub fn any_intersect(
        &self,
        ray: &Ray<f32>,
        mut prim_intersect: impl FnMut(u16, u32, &Ray<f32>) -> Option<ShapeHit>,
    ) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let mut to_visit = [0usize; TRAVERSAL_STACK_SIZE];
        let mut to_visit_count = 0usize;
        let mut node_index = 0usize;
        loop {
            let node = &self.nodes[node_index];
            if node.bounds.intersections(*ray).is_some() {
                match node.content {
                    BvhNodeContent::Interior { second_child_index } => {
                        debug_assert!(to_visit_count < TRAVERSAL_STACK_SIZE);
                        to_visit[to_visit_count] = second_child_index as usize;
                        to_visit_count += 1;
                        node_index += 1;
                        continue;
                    }
                    BvhNodeContent::Leaf { geom_id, prim_id } => {
                        if prim_intersect(geom_id, prim_id, ray).is_some() {
                            return true;
                        }
                    }
                }
            }

            if to_visit_count == 0 {
                break;
            }
            to_visit_count -= 1;
            node_index = to_visit[to_visit_count];
        }
        false
    }

    /// Depth of the deepest leaf, counting the root as depth 1.
    pub fn max_leaf_depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut max_depth = 0usize;
        let mut stack = vec![(0usize, 1usize)];
        while let Some((node_index, depth)) = stack.pop() {
            match self.nodes[node_index].content {
                BvhNodeContent::Interior { second_child_index } => {
                    stack.push((node_index + 1, depth + 1));
                    stack.push((second_child_index as usize, depth + 1));
                }
                BvhNodeContent::Leaf { .. } => max_depth = max_depth.max(depth),
            }
        }
        max_depth
    }
}
