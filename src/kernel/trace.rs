// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Trace kernel - symbolic dry-run backend
//!
//! Records every construction as an expression tree instead of computing
//! geometry. Scripts can be replayed against it to check their structure,
//! snapshot the recorded tree, or produce a rough bounding-box preview
//! without a B-rep kernel in the loop.
//!
//! The backend is deliberately partial: bounding boxes are conservative and
//! unavailable for swept shapes, triangulation emits the bounding box as a
//! 12-triangle shell, and topology walks yield fixed per-primitive sub-shape
//! sets.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::{BooleanOp, Kernel, LoftSection};
use crate::error::{Error, Result};
use crate::geometry::{BoundingBox, TriangleMesh};
use crate::utils::math::{Axis3, Mat4, Point3, Vec3};

/// Profile handles minted by the kernel start above any structural walk
/// index, so a minted edge id never collides with a walked one.
const PROFILE_ID_BASE: u64 = 1_000;

/// Symbolic edge handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceEdge {
    pub id: u64,
}

impl TraceEdge {
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

/// Symbolic face handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceFace {
    pub id: u64,
}

impl TraceFace {
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

/// Symbolic wire handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceWire {
    pub id: u64,
}

impl TraceWire {
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

/// Symbolic vertex handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceVertex {
    pub id: u64,
}

impl TraceVertex {
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

/// Recorded construction tree.
///
/// Equality is structural, which is what tests of the accumulation protocol
/// compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TraceShape {
    Cuboid {
        min: Point3,
        max: Point3,
    },
    Cylinder {
        origin: Point3,
        dir: Vec3,
        radius: f64,
        height: f64,
    },
    Cone {
        origin: Point3,
        dir: Vec3,
        r1: f64,
        r2: f64,
        height: f64,
    },
    Sphere {
        center: Point3,
        radius: f64,
    },
    Torus {
        origin: Point3,
        dir: Vec3,
        ring_radius: f64,
        radius: f64,
    },
    Extruded {
        profile: Box<TraceShape>,
        vector: Vec3,
    },
    Revolved {
        profile: Box<TraceShape>,
        origin: Point3,
        dir: Vec3,
        angle: f64,
    },
    Lofted {
        sections: Vec<TraceShape>,
        ruled: bool,
    },
    Piped {
        profile: Box<TraceShape>,
        path: Box<TraceShape>,
    },
    Boolean {
        op: BooleanOp,
        lhs: Box<TraceShape>,
        rhs: Box<TraceShape>,
    },
    Transformed {
        shape: Box<TraceShape>,
        matrix: Mat4,
    },
    Filleted {
        shape: Box<TraceShape>,
        radius: f64,
        edges: Vec<u64>,
    },
    Chamfered {
        shape: Box<TraceShape>,
        distance: f64,
        edges: Vec<u64>,
    },
    Vertex {
        id: u64,
    },
    Edge {
        id: u64,
    },
    Wire {
        id: u64,
    },
    Face {
        id: u64,
    },
}

impl From<TraceVertex> for TraceShape {
    fn from(v: TraceVertex) -> Self {
        TraceShape::Vertex { id: v.id }
    }
}

impl From<TraceEdge> for TraceShape {
    fn from(e: TraceEdge) -> Self {
        TraceShape::Edge { id: e.id }
    }
}

impl From<TraceWire> for TraceShape {
    fn from(w: TraceWire) -> Self {
        TraceShape::Wire { id: w.id }
    }
}

impl From<TraceFace> for TraceShape {
    fn from(f: TraceFace) -> Self {
        TraceShape::Face { id: f.id }
    }
}

impl TraceShape {
    /// Nominal (edges, faces, vertices, wires) counts for primitive leaves.
    /// These are stable walk fixtures, not a model of any kernel's seams.
    fn structural_counts(&self) -> Option<(u64, u64, u64, u64)> {
        match self {
            TraceShape::Cuboid { .. } => Some((12, 6, 8, 6)),
            TraceShape::Cylinder { .. } | TraceShape::Cone { .. } => Some((2, 3, 2, 3)),
            TraceShape::Sphere { .. } => Some((1, 1, 2, 1)),
            TraceShape::Torus { .. } => Some((2, 1, 0, 1)),
            _ => None,
        }
    }

    /// Walk one topology kind, appending indices in pass order. Boolean
    /// results concatenate both operands' walks without deduplication, so a
    /// sub-shape present on both sides shows up twice.
    fn walk_ids(&self, select: fn((u64, u64, u64, u64)) -> u64, out: &mut Vec<u64>) {
        match self {
            TraceShape::Boolean { lhs, rhs, .. } => {
                lhs.walk_ids(select, out);
                rhs.walk_ids(select, out);
            }
            TraceShape::Transformed { shape, .. }
            | TraceShape::Filleted { shape, .. }
            | TraceShape::Chamfered { shape, .. } => shape.walk_ids(select, out),
            other => {
                if let Some(counts) = other.structural_counts() {
                    out.extend(0..select(counts));
                }
                // Swept shapes and profile handles record no structural
                // topology.
            }
        }
    }

    fn walked<T>(&self, select: fn((u64, u64, u64, u64)) -> u64, make: fn(u64) -> T) -> Vec<T> {
        let mut ids = Vec::new();
        self.walk_ids(select, &mut ids);
        ids.into_iter().map(make).collect()
    }

    /// Conservative bounding box. Swept shapes and profile handles are not
    /// supported by the dry-run backend.
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        match self {
            TraceShape::Cuboid { min, max } => Ok(BoundingBox::new(*min, *max)),
            TraceShape::Sphere { center, radius } => Ok(BoundingBox::new(
                center - Vec3::repeat(*radius),
                center + Vec3::repeat(*radius),
            )),
            TraceShape::Cylinder {
                origin,
                dir,
                radius,
                height,
            } => Ok(axis_slab(origin, dir, *height, *radius)),
            TraceShape::Cone {
                origin,
                dir,
                r1,
                r2,
                height,
            } => Ok(axis_slab(origin, dir, *height, r1.max(*r2))),
            TraceShape::Torus {
                origin,
                ring_radius,
                radius,
                ..
            } => {
                let reach = ring_radius + radius;
                Ok(BoundingBox::new(*origin, *origin).inflate(reach))
            }
            TraceShape::Extruded { profile, vector } => {
                let base = profile.bounding_box()?;
                Ok(base.union(&base.translated(vector)))
            }
            TraceShape::Boolean { op, lhs, rhs } => {
                let a = lhs.bounding_box()?;
                let b = rhs.bounding_box()?;
                Ok(match op {
                    BooleanOp::Union => a.union(&b),
                    BooleanOp::Intersection => a.intersection(&b),
                    BooleanOp::Difference => a,
                })
            }
            TraceShape::Transformed { shape, matrix } => {
                let inner = shape.bounding_box()?;
                if inner.is_empty() {
                    return Ok(inner);
                }
                let corners = inner.corners().map(|c| matrix.transform_point(&c));
                Ok(BoundingBox::from_points(&corners))
            }
            TraceShape::Filleted { shape, .. } | TraceShape::Chamfered { shape, .. } => {
                shape.bounding_box()
            }
            TraceShape::Revolved { .. } | TraceShape::Lofted { .. } | TraceShape::Piped { .. } => {
                Err(Error::Unsupported("bounding box of swept trace shapes"))
            }
            TraceShape::Vertex { .. }
            | TraceShape::Edge { .. }
            | TraceShape::Wire { .. }
            | TraceShape::Face { .. } => {
                Err(Error::Unsupported("bounding box of profile handles"))
            }
        }
    }
}

fn axis_slab(origin: &Point3, dir: &Vec3, height: f64, radius: f64) -> BoundingBox {
    let tip = origin + dir * height;
    BoundingBox::from_points(&[*origin, tip]).inflate(radius)
}

/// Kernel that records constructions instead of computing them
#[derive(Debug)]
pub struct TraceKernel {
    next_profile_id: AtomicU64,
}

impl TraceKernel {
    pub fn new() -> Self {
        Self {
            next_profile_id: AtomicU64::new(PROFILE_ID_BASE),
        }
    }

    fn mint(&self) -> u64 {
        self.next_profile_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for TraceKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for TraceKernel {
    type Shape = TraceShape;
    type Vertex = TraceVertex;
    type Edge = TraceEdge;
    type Wire = TraceWire;
    type Face = TraceFace;

    fn make_box(&self, p1: Point3, p2: Point3) -> Result<TraceShape> {
        Ok(TraceShape::Cuboid {
            min: Point3::new(p1.x.min(p2.x), p1.y.min(p2.y), p1.z.min(p2.z)),
            max: Point3::new(p1.x.max(p2.x), p1.y.max(p2.y), p1.z.max(p2.z)),
        })
    }

    fn make_cylinder(&self, axis: &Axis3, radius: f64, height: f64) -> Result<TraceShape> {
        Ok(TraceShape::Cylinder {
            origin: axis.origin,
            dir: axis.direction(),
            radius,
            height,
        })
    }

    fn make_cone(&self, axis: &Axis3, r1: f64, r2: f64, height: f64) -> Result<TraceShape> {
        Ok(TraceShape::Cone {
            origin: axis.origin,
            dir: axis.direction(),
            r1,
            r2,
            height,
        })
    }

    fn make_sphere(&self, center: Point3, radius: f64) -> Result<TraceShape> {
        Ok(TraceShape::Sphere { center, radius })
    }

    fn make_torus(&self, axis: &Axis3, ring_radius: f64, radius: f64) -> Result<TraceShape> {
        Ok(TraceShape::Torus {
            origin: axis.origin,
            dir: axis.direction(),
            ring_radius,
            radius,
        })
    }

    fn extrude(&self, profile: &TraceShape, vector: &Vec3) -> Result<TraceShape> {
        Ok(TraceShape::Extruded {
            profile: Box::new(profile.clone()),
            vector: *vector,
        })
    }

    fn revolve(&self, profile: &TraceShape, axis: &Axis3, angle_rad: f64) -> Result<TraceShape> {
        Ok(TraceShape::Revolved {
            profile: Box::new(profile.clone()),
            origin: axis.origin,
            dir: axis.direction(),
            angle: angle_rad,
        })
    }

    fn loft(
        &self,
        sections: &[LoftSection<Self>],
        ruled: bool,
        _tolerance: f64,
    ) -> Result<TraceShape> {
        if sections.is_empty() {
            return Err(Error::Kernel("loft requires at least one section".into()));
        }
        let sections = sections
            .iter()
            .map(|section| match section {
                LoftSection::Wire(w) => TraceShape::from(*w),
                LoftSection::Edge(e) => TraceShape::from(*e),
                LoftSection::Vertex(v) => TraceShape::from(*v),
            })
            .collect();
        Ok(TraceShape::Lofted { sections, ruled })
    }

    fn pipe(&self, profile: &TraceFace, path: &TraceWire) -> Result<TraceShape> {
        Ok(TraceShape::Piped {
            profile: Box::new(TraceShape::from(*profile)),
            path: Box::new(TraceShape::from(*path)),
        })
    }

    fn make_vertex(&self, _point: Point3) -> Result<TraceVertex> {
        Ok(TraceVertex::new(self.mint()))
    }

    fn make_line(&self, _p1: Point3, _p2: Point3) -> Result<TraceEdge> {
        Ok(TraceEdge::new(self.mint()))
    }

    fn make_arc(&self, _start: Point3, _end: Point3, _mid: Point3) -> Result<TraceEdge> {
        Ok(TraceEdge::new(self.mint()))
    }

    fn make_circle(&self, _center: Point3, _normal: Vec3, _radius: f64) -> Result<TraceEdge> {
        Ok(TraceEdge::new(self.mint()))
    }

    fn make_ellipse(
        &self,
        _center: Point3,
        _normal: Vec3,
        _r_major: f64,
        _r_minor: f64,
    ) -> Result<TraceEdge> {
        Ok(TraceEdge::new(self.mint()))
    }

    fn make_helix(
        &self,
        _pitch: f64,
        _height: f64,
        _radius: f64,
        _cone_angle_rad: f64,
        _left_handed: bool,
    ) -> Result<TraceEdge> {
        Ok(TraceEdge::new(self.mint()))
    }

    fn make_wire(&self, edges: &[TraceEdge]) -> Result<TraceWire> {
        if edges.is_empty() {
            return Err(Error::Kernel("wire requires at least one edge".into()));
        }
        Ok(TraceWire::new(self.mint()))
    }

    fn make_face(&self, _outer: &TraceWire, _holes: &[TraceWire]) -> Result<TraceFace> {
        Ok(TraceFace::new(self.mint()))
    }

    fn boolean(&self, op: BooleanOp, a: &TraceShape, b: &TraceShape) -> Result<TraceShape> {
        Ok(TraceShape::Boolean {
            op,
            lhs: Box::new(a.clone()),
            rhs: Box::new(b.clone()),
        })
    }

    fn transform(&self, shape: &TraceShape, matrix: &Mat4) -> Result<TraceShape> {
        Ok(TraceShape::Transformed {
            shape: Box::new(shape.clone()),
            matrix: *matrix,
        })
    }

    fn fillet(&self, shape: &TraceShape, radius: f64, edges: &[TraceEdge]) -> Result<TraceShape> {
        Ok(TraceShape::Filleted {
            shape: Box::new(shape.clone()),
            radius,
            edges: edges.iter().map(|e| e.id).collect(),
        })
    }

    fn chamfer(
        &self,
        shape: &TraceShape,
        distance: f64,
        edges: &[(TraceEdge, TraceFace)],
    ) -> Result<TraceShape> {
        Ok(TraceShape::Chamfered {
            shape: Box::new(shape.clone()),
            distance,
            edges: edges.iter().map(|(e, _)| e.id).collect(),
        })
    }

    fn adjacent_face(&self, shape: &TraceShape, edge: &TraceEdge) -> Result<TraceFace> {
        let faces = self.faces(shape)?;
        if faces.is_empty() {
            return Err(Error::Kernel(format!(
                "no face adjacent to edge {} in shape",
                edge.id
            )));
        }
        Ok(faces[(edge.id as usize) % faces.len()])
    }

    fn triangulate(&self, shape: &TraceShape, _deflection: f64) -> Result<TriangleMesh> {
        Ok(TriangleMesh::from_bounding_box(&shape.bounding_box()?))
    }

    fn bounding_box(&self, shape: &TraceShape) -> Result<BoundingBox> {
        shape.bounding_box()
    }

    fn center_of_mass(&self, shape: &TraceShape) -> Result<Point3> {
        let bbox = shape.bounding_box()?;
        if bbox.is_empty() {
            return Err(Error::Kernel("shape encloses no volume".into()));
        }
        Ok(bbox.center())
    }

    fn edges(&self, shape: &TraceShape) -> Result<Vec<TraceEdge>> {
        Ok(shape.walked(|c| c.0, TraceEdge::new))
    }

    fn faces(&self, shape: &TraceShape) -> Result<Vec<TraceFace>> {
        Ok(shape.walked(|c| c.1, TraceFace::new))
    }

    fn vertices(&self, shape: &TraceShape) -> Result<Vec<TraceVertex>> {
        Ok(shape.walked(|c| c.2, TraceVertex::new))
    }

    fn wires(&self, shape: &TraceShape) -> Result<Vec<TraceWire>> {
        Ok(shape.walked(|c| c.3, TraceWire::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn kernel() -> TraceKernel {
        TraceKernel::new()
    }

    fn unit_box(k: &TraceKernel) -> TraceShape {
        k.make_box(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .unwrap()
    }

    #[test]
    fn test_box_corners_normalized() {
        let k = kernel();
        let shape = k
            .make_box(Point3::new(5.0, 0.0, 2.0), Point3::new(1.0, 4.0, -2.0))
            .unwrap();
        assert_eq!(
            shape,
            TraceShape::Cuboid {
                min: Point3::new(1.0, 0.0, -2.0),
                max: Point3::new(5.0, 4.0, 2.0),
            }
        );
    }

    #[test]
    fn test_union_bbox() {
        let k = kernel();
        let a = unit_box(&k);
        let b = k
            .make_box(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 1.0, 1.0))
            .unwrap();
        let fused = k.boolean(BooleanOp::Union, &a, &b).unwrap();
        let bbox = k.bounding_box(&fused).unwrap();
        assert_eq!(bbox.to_tuple(), (0.0, 0.0, 0.0, 3.0, 1.0, 1.0));
    }

    #[test]
    fn test_cut_bbox_is_lhs() {
        let k = kernel();
        let a = unit_box(&k);
        let b = k.make_sphere(Point3::origin(), 10.0).unwrap();
        let cut = k.boolean(BooleanOp::Difference, &a, &b).unwrap();
        assert_eq!(
            k.bounding_box(&cut).unwrap(),
            k.bounding_box(&a).unwrap()
        );
    }

    #[test]
    fn test_transformed_bbox() {
        let k = kernel();
        let a = unit_box(&k);
        let moved = k
            .transform(&a, &crate::utils::math::translation(Vec3::new(10.0, 0.0, 0.0)))
            .unwrap();
        let bbox = k.bounding_box(&moved).unwrap();
        assert_relative_eq!(bbox.min.x, 10.0);
        assert_relative_eq!(bbox.max.x, 11.0);
    }

    #[test]
    fn test_duplicate_edge_ids_across_fuse() {
        // Both operands walk their own structural edges; ids repeat. Known
        // behavior of the one-pass walk, kept as is.
        let k = kernel();
        let a = unit_box(&k);
        let b = unit_box(&k);
        let fused = k.boolean(BooleanOp::Union, &a, &b).unwrap();
        let edges = k.edges(&fused).unwrap();
        assert_eq!(edges.len(), 24);
        assert_eq!(edges.iter().filter(|e| e.id == 0).count(), 2);
    }

    #[test]
    fn test_triangulate_emits_bbox_shell() {
        let k = kernel();
        let mesh = k.triangulate(&unit_box(&k), 0.05).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_swept_bbox_unsupported() {
        let k = kernel();
        let edge = k
            .make_line(Point3::origin(), Point3::new(1.0, 0.0, 0.0))
            .unwrap();
        let wire = k.make_wire(&[edge]).unwrap();
        let face = k.make_face(&wire, &[]).unwrap();
        let piped = k.pipe(&face, &wire).unwrap();
        assert!(matches!(
            k.bounding_box(&piped),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_empty_loft_rejected() {
        let k = kernel();
        assert!(matches!(
            k.loft(&[], true, 1e-6),
            Err(Error::Kernel(_))
        ));
    }

    #[test]
    fn test_minted_ids_clear_of_structural_range() {
        let k = kernel();
        let e = k
            .make_line(Point3::origin(), Point3::new(1.0, 0.0, 0.0))
            .unwrap();
        assert!(e.id >= PROFILE_ID_BASE);
    }
}
