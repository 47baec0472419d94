// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! The kernel seam - a narrow interface to an external CAD kernel
//!
//! Every genuinely geometric operation (primitive construction, booleans,
//! filleting, triangulation, topology) is delegated through [`Kernel`]. The
//! builder never inspects shape internals; it only passes whole handles back
//! into kernel operations. B-rep kernels implement this trait out of tree;
//! the in-tree [`TraceKernel`] records constructions symbolically for dry
//! runs and tests.

mod trace;

pub use trace::{TraceEdge, TraceFace, TraceKernel, TraceShape, TraceVertex, TraceWire};

use crate::error::Result;
use crate::geometry::{BoundingBox, TriangleMesh};
use crate::utils::math::{Axis3, Mat4, Point3, Vec3};
use serde::{Deserialize, Serialize};

/// Default tolerance for lofting through profile sections
pub const DEFAULT_LOFT_TOLERANCE: f64 = 1e-6;

/// Binary combinators over two solids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanOp {
    /// Fuse both solids into one
    Union,
    /// Keep only the common volume
    Intersection,
    /// Cut the second solid out of the first
    Difference,
}

/// One section of a loft: a closed wire, a bare edge (coerced into a
/// one-edge wire by the builder), or a degenerate point cap
pub enum LoftSection<K: Kernel + ?Sized> {
    Wire(K::Wire),
    Edge(K::Edge),
    Vertex(K::Vertex),
}

impl<K: Kernel + ?Sized> Clone for LoftSection<K> {
    fn clone(&self) -> Self {
        match self {
            Self::Wire(w) => Self::Wire(w.clone()),
            Self::Edge(e) => Self::Edge(e.clone()),
            Self::Vertex(v) => Self::Vertex(v.clone()),
        }
    }
}

/// External geometry kernel behind an opaque-handle interface.
///
/// Shape handles are never inspected by the scripting layer. Sub-shape
/// handles (vertices, edges, wires, faces) convert into whole-shape handles
/// so profiles can feed sweeps directly.
pub trait Kernel {
    type Shape: Clone;
    type Vertex: Clone + Into<Self::Shape>;
    type Edge: Clone + Into<Self::Shape>;
    type Wire: Clone + Into<Self::Shape>;
    type Face: Clone + Into<Self::Shape>;

    // --- primitive construction ---

    fn make_box(&self, p1: Point3, p2: Point3) -> Result<Self::Shape>;
    fn make_cylinder(&self, axis: &Axis3, radius: f64, height: f64) -> Result<Self::Shape>;
    fn make_cone(&self, axis: &Axis3, r1: f64, r2: f64, height: f64) -> Result<Self::Shape>;
    fn make_sphere(&self, center: Point3, radius: f64) -> Result<Self::Shape>;
    fn make_torus(&self, axis: &Axis3, ring_radius: f64, radius: f64) -> Result<Self::Shape>;
    fn extrude(&self, profile: &Self::Shape, vector: &Vec3) -> Result<Self::Shape>;
    fn revolve(&self, profile: &Self::Shape, axis: &Axis3, angle_rad: f64) -> Result<Self::Shape>;
    fn loft(
        &self,
        sections: &[LoftSection<Self>],
        ruled: bool,
        tolerance: f64,
    ) -> Result<Self::Shape>;
    fn pipe(&self, profile: &Self::Face, path: &Self::Wire) -> Result<Self::Shape>;

    // --- profile construction ---

    fn make_vertex(&self, point: Point3) -> Result<Self::Vertex>;
    fn make_line(&self, p1: Point3, p2: Point3) -> Result<Self::Edge>;
    /// Circular arc through three points: start, end, and a point on the arc.
    fn make_arc(&self, start: Point3, end: Point3, mid: Point3) -> Result<Self::Edge>;
    fn make_circle(&self, center: Point3, normal: Vec3, radius: f64) -> Result<Self::Edge>;
    fn make_ellipse(
        &self,
        center: Point3,
        normal: Vec3,
        r_major: f64,
        r_minor: f64,
    ) -> Result<Self::Edge>;
    /// Helical edge around the z axis; a positive cone angle produces a
    /// conical spiral.
    fn make_helix(
        &self,
        pitch: f64,
        height: f64,
        radius: f64,
        cone_angle_rad: f64,
        left_handed: bool,
    ) -> Result<Self::Edge>;
    fn make_wire(&self, edges: &[Self::Edge]) -> Result<Self::Wire>;
    fn make_face(&self, outer: &Self::Wire, holes: &[Self::Wire]) -> Result<Self::Face>;

    // --- combination and modification ---

    fn boolean(&self, op: BooleanOp, a: &Self::Shape, b: &Self::Shape) -> Result<Self::Shape>;
    fn transform(&self, shape: &Self::Shape, matrix: &Mat4) -> Result<Self::Shape>;
    fn fillet(&self, shape: &Self::Shape, radius: f64, edges: &[Self::Edge])
        -> Result<Self::Shape>;
    /// Chamfer along edges, each paired with one of its adjacent faces.
    fn chamfer(
        &self,
        shape: &Self::Shape,
        distance: f64,
        edges: &[(Self::Edge, Self::Face)],
    ) -> Result<Self::Shape>;
    /// One face adjacent to `edge` within `shape`, resolved through the
    /// kernel's edge-to-face adjacency map.
    fn adjacent_face(&self, shape: &Self::Shape, edge: &Self::Edge) -> Result<Self::Face>;

    // --- inspection ---

    fn triangulate(&self, shape: &Self::Shape, deflection: f64) -> Result<TriangleMesh>;
    fn bounding_box(&self, shape: &Self::Shape) -> Result<BoundingBox>;
    fn center_of_mass(&self, shape: &Self::Shape) -> Result<Point3>;

    // --- topology walks ---
    //
    // Each walk is one pass over the shape's topology graph. A sub-shape
    // reachable through several parents may be yielded more than once;
    // implementations are not required to deduplicate.

    fn edges(&self, shape: &Self::Shape) -> Result<Vec<Self::Edge>>;
    fn faces(&self, shape: &Self::Shape) -> Result<Vec<Self::Face>>;
    fn vertices(&self, shape: &Self::Shape) -> Result<Vec<Self::Vertex>>;
    fn wires(&self, shape: &Self::Shape) -> Result<Vec<Self::Wire>>;
}
