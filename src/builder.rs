// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! The scene builder - scoped accumulation of one current object
//!
//! A [`Builder`] holds the single shape under construction and a pending
//! operator that decides how the next shape folds into it. The first shape
//! fed to any scope seeds it unconditionally; every later shape is combined
//! with the scope's fixed combinator. Grouping operations open a nested
//! scope, build a sub-assembly, optionally post-process it as a whole, and
//! merge it into the enclosing scope on exit.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::Error;
use crate::geometry::BoundingBox;
use crate::io::{export_stl, DEFAULT_DEFLECTION};
use crate::kernel::{BooleanOp, Kernel, LoftSection, DEFAULT_LOFT_TOLERANCE};
use crate::scope::ScopeFrame;
use crate::select::EdgeSelector;
use crate::utils::math::{
    matrix_from_rows, matrix_from_rows3, rotation_about, translation, Axis3, Mat4, Point3, Vec3,
};

/// Per-scope operator state. A fresh scope seeds with its first shape, then
/// combines every later shape with the scope's combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PendingOp {
    Seeding(BooleanOp),
    Combining(BooleanOp),
}

/// Accumulates one scene against a geometry kernel.
///
/// ```
/// use poc::{Builder, TraceKernel};
///
/// # fn main() -> anyhow::Result<()> {
/// let mut b = Builder::new(TraceKernel::new());
/// b.cuboid([0.0, 0.0, 0.0], [30.0, 20.0, 10.0])?;
/// b.difference(|b| b.cylinder([15.0, 10.0, -1.0], [15.0, 10.0, 11.0], 4.0))?;
/// assert!(b.object().is_some());
/// # Ok(())
/// # }
/// ```
pub struct Builder<K: Kernel> {
    pub(crate) kernel: K,
    pub(crate) current: Option<K::Shape>,
    pub(crate) pending: PendingOp,
}

impl<K: Kernel + fmt::Debug> fmt::Debug for Builder<K>
where
    K::Shape: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("kernel", &self.kernel)
            .field("current", &self.current)
            .field("pending", &self.pending)
            .finish()
    }
}

impl<K: Kernel> Builder<K> {
    /// Fresh top-level scope: no current object, union combinator.
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            current: None,
            pending: PendingOp::Seeding(BooleanOp::Union),
        }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// The shape under construction, if any shape has been fed to this scope.
    pub fn object(&self) -> Option<&K::Shape> {
        self.current.as_ref()
    }

    /// Consume the builder, yielding the finished shape.
    pub fn into_object(self) -> Option<K::Shape> {
        self.current
    }

    /// Fold `shape` into the current object through the pending operator.
    ///
    /// The first shape in a scope replaces the current object outright;
    /// later shapes combine with the scope's combinator. `None` fails with
    /// [`Error::NullShape`] before any kernel call, catching constructors
    /// that silently produced nothing. A failed combination leaves the
    /// current object and the pending operator untouched.
    pub fn do_op(&mut self, shape: Option<K::Shape>) -> Result<(), Error> {
        let shape = shape.ok_or(Error::NullShape)?;
        match self.pending {
            PendingOp::Seeding(op) => {
                self.current = Some(shape);
                self.pending = PendingOp::Combining(op);
            }
            PendingOp::Combining(op) => {
                let current = self.current.as_ref().ok_or(Error::NoCurrentObject)?;
                let combined = self.kernel.boolean(op, current, &shape)?;
                self.current = Some(combined);
            }
        }
        Ok(())
    }

    // --- primitives ---

    /// Box spanned by two opposite corners.
    pub fn cuboid(&mut self, p1: impl Into<Point3>, p2: impl Into<Point3>) -> Result<()> {
        let shape = self
            .kernel
            .make_box(p1.into(), p2.into())
            .context("box construction failed")?;
        self.do_op(Some(shape))?;
        Ok(())
    }

    /// Cylinder between two axis endpoints.
    pub fn cylinder(
        &mut self,
        p1: impl Into<Point3>,
        p2: impl Into<Point3>,
        radius: f64,
    ) -> Result<()> {
        let (axis, height) = Axis3::between(p1.into(), p2.into())?;
        let shape = self
            .kernel
            .make_cylinder(&axis, radius, height)
            .context("cylinder construction failed")?;
        self.do_op(Some(shape))?;
        Ok(())
    }

    /// Cone between two axis endpoints with start and end radii.
    pub fn cone(
        &mut self,
        p1: impl Into<Point3>,
        p2: impl Into<Point3>,
        r1: f64,
        r2: f64,
    ) -> Result<()> {
        let (axis, height) = Axis3::between(p1.into(), p2.into())?;
        let shape = self
            .kernel
            .make_cone(&axis, r1, r2, height)
            .context("cone construction failed")?;
        self.do_op(Some(shape))?;
        Ok(())
    }

    pub fn sphere(&mut self, center: impl Into<Point3>, radius: f64) -> Result<()> {
        let shape = self
            .kernel
            .make_sphere(center.into(), radius)
            .context("sphere construction failed")?;
        self.do_op(Some(shape))?;
        Ok(())
    }

    /// Torus around the axis from `p1` toward `p2`.
    pub fn torus(
        &mut self,
        p1: impl Into<Point3>,
        p2: impl Into<Point3>,
        ring_radius: f64,
        radius: f64,
    ) -> Result<()> {
        let (axis, _) = Axis3::between(p1.into(), p2.into())?;
        let shape = self
            .kernel
            .make_torus(&axis, ring_radius, radius)
            .context("torus construction failed")?;
        self.do_op(Some(shape))?;
        Ok(())
    }

    /// Extruded text.
    ///
    /// TODO: needs a font-outline channel in the kernel trait; until then
    /// this feeds a unit box placeholder.
    pub fn text(&mut self, _height: f64, _depth: f64, _text: &str) -> Result<()> {
        self.cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0])
    }

    /// Extrude a planar profile (edge, wire, or face) from `p1` to `p2`.
    pub fn extrude(
        &mut self,
        profile: impl Into<K::Shape>,
        p1: impl Into<Point3>,
        p2: impl Into<Point3>,
    ) -> Result<()> {
        let vector = p2.into() - p1.into();
        let shape = self
            .kernel
            .extrude(&profile.into(), &vector)
            .context("extrude failed")?;
        self.do_op(Some(shape))?;
        Ok(())
    }

    /// Revolve a profile by `angle_deg` around the axis from `p1` to `p2`.
    pub fn revolve(
        &mut self,
        profile: impl Into<K::Shape>,
        p1: impl Into<Point3>,
        p2: impl Into<Point3>,
        angle_deg: f64,
    ) -> Result<()> {
        let (axis, _) = Axis3::between(p1.into(), p2.into())?;
        let shape = self
            .kernel
            .revolve(&profile.into(), &axis, angle_deg.to_radians())
            .context("revolve failed")?;
        self.do_op(Some(shape))?;
        Ok(())
    }

    /// Loft through an ordered sequence of sections at the default
    /// tolerance.
    pub fn loft(&mut self, sections: Vec<LoftSection<K>>, ruled: bool) -> Result<()> {
        self.loft_with(sections, ruled, DEFAULT_LOFT_TOLERANCE)
    }

    /// Loft with an explicit tolerance. Bare edge sections are coerced into
    /// one-edge wires before the kernel call.
    pub fn loft_with(
        &mut self,
        sections: Vec<LoftSection<K>>,
        ruled: bool,
        tolerance: f64,
    ) -> Result<()> {
        let sections = sections
            .into_iter()
            .map(|section| match section {
                LoftSection::Edge(edge) => {
                    Ok(LoftSection::Wire(self.kernel.make_wire(&[edge])?))
                }
                other => Ok(other),
            })
            .collect::<Result<Vec<_>, Error>>()?;
        let shape = self
            .kernel
            .loft(&sections, ruled, tolerance)
            .context("loft failed")?;
        self.do_op(Some(shape))?;
        Ok(())
    }

    /// Sweep a cross-section face along a path wire.
    pub fn pipe(&mut self, profile: K::Face, path: K::Wire) -> Result<()> {
        let shape = self.kernel.pipe(&profile, &path).context("pipe failed")?;
        self.do_op(Some(shape))?;
        Ok(())
    }

    /// Sweep along a single edge, coerced into a one-edge wire.
    pub fn pipe_along(&mut self, profile: K::Face, edge: K::Edge) -> Result<()> {
        let path = self.kernel.make_wire(&[edge])?;
        self.pipe(profile, path)
    }

    // --- grouping operations ---

    /// Scope whose contents fuse together.
    pub fn union<R>(&mut self, body: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.grouped(BooleanOp::Union, body)
    }

    /// Scope whose contents intersect.
    pub fn intersection<R>(&mut self, body: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.grouped(BooleanOp::Intersection, body)
    }

    /// Scope whose contents are cut from its first shape.
    pub fn difference<R>(&mut self, body: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.grouped(BooleanOp::Difference, body)
    }

    /// Scope with an explicit combinator.
    pub fn grouped<R>(
        &mut self,
        op: BooleanOp,
        body: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        self.grouped_with(op, |_| Ok(()), body)
    }

    /// Scope with a finishing transform.
    ///
    /// The sub-assembly built by `body` seeds a fresh accumulator with
    /// combinator `op`. `finish` post-processes the sub-object as a whole
    /// and runs on every exit path, so a failed body still gets its
    /// finishing transform before the merge. The result merges into the
    /// enclosing scope through the enclosing pending operator; the enclosing
    /// (object, operator) pair is restored on every exit path. Body errors
    /// take precedence over finish and merge errors.
    pub fn grouped_with<R>(
        &mut self,
        op: BooleanOp,
        finish: impl FnOnce(&mut Self) -> Result<()>,
        body: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let mut frame = ScopeFrame::enter(self, op);
        let body_result = body(frame.builder());
        let finish_result = finish(frame.builder());
        let merge_result = frame.exit();
        let value = body_result?;
        finish_result?;
        merge_result?;
        Ok(value)
    }

    /// Group rotated as a whole after it is built.
    pub fn rotated<R>(
        &mut self,
        angle_deg: f64,
        axis: impl Into<Vec3>,
        body: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let axis = axis.into();
        self.grouped_with(BooleanOp::Union, move |b| b.rotate(angle_deg, axis), body)
    }

    /// Group translated as a whole after it is built.
    pub fn translated<R>(
        &mut self,
        delta: impl Into<Vec3>,
        body: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let delta = delta.into();
        self.grouped_with(BooleanOp::Union, move |b| b.translate(delta), body)
    }

    /// Group transformed as a whole after it is built.
    pub fn transformed<R>(
        &mut self,
        matrix: Mat4,
        body: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        self.grouped_with(BooleanOp::Union, move |b| b.transform(&matrix), body)
    }

    /// Group filleted as a whole after it is built.
    pub fn filleted<'a, R>(
        &mut self,
        radius: f64,
        edges: EdgeSelector<'a, K>,
        body: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        self.grouped_with(BooleanOp::Union, move |b| b.fillet(radius, edges), body)
    }

    /// Group chamfered as a whole after it is built.
    pub fn chamfered<'a, R>(
        &mut self,
        distance: f64,
        edges: EdgeSelector<'a, K>,
        body: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        self.grouped_with(BooleanOp::Union, move |b| b.chamfer(distance, edges), body)
    }

    // --- postfix mutators ---
    //
    // These replace the current object in place. They do not consume a
    // pending-operator element.

    /// Rotate the current object by `angle_deg` around an axis through the
    /// origin.
    pub fn rotate(&mut self, angle_deg: f64, axis: impl Into<Vec3>) -> Result<()> {
        self.rotate_about(angle_deg, axis, Point3::origin())
    }

    pub fn rotate_about(
        &mut self,
        angle_deg: f64,
        axis: impl Into<Vec3>,
        center: impl Into<Point3>,
    ) -> Result<()> {
        let matrix = rotation_about(angle_deg.to_radians(), axis.into(), center.into())?;
        self.transform(&matrix)
    }

    pub fn translate(&mut self, delta: impl Into<Vec3>) -> Result<()> {
        self.transform(&translation(delta.into()))
    }

    /// Apply an affine transform given as three 4-wide rows.
    pub fn transform_rows(&mut self, rows: [[f64; 4]; 3]) -> Result<()> {
        self.transform(&matrix_from_rows(rows))
    }

    /// Apply a rotation-only transform given as three 3-wide rows.
    pub fn transform_rows3(&mut self, rows: [[f64; 3]; 3]) -> Result<()> {
        self.transform(&matrix_from_rows3(rows))
    }

    pub fn transform(&mut self, matrix: &Mat4) -> Result<()> {
        let shape = self.current.as_ref().ok_or(Error::NoCurrentObject)?;
        let transformed = self
            .kernel
            .transform(shape, matrix)
            .context("transform failed")?;
        self.current = Some(transformed);
        Ok(())
    }

    /// Fillet selected edges of the current object.
    pub fn fillet(&mut self, radius: f64, edges: EdgeSelector<'_, K>) -> Result<()> {
        let shape = self.current.as_ref().ok_or(Error::NoCurrentObject)?;
        let picked = edges.resolve(&self.kernel, shape)?;
        let filleted = self
            .kernel
            .fillet(shape, radius, &picked)
            .context("fillet failed")?;
        self.current = Some(filleted);
        Ok(())
    }

    /// Chamfer selected edges of the current object. Each edge is paired
    /// with one adjacent face resolved through the kernel's adjacency map.
    pub fn chamfer(&mut self, distance: f64, edges: EdgeSelector<'_, K>) -> Result<()> {
        let shape = self.current.as_ref().ok_or(Error::NoCurrentObject)?;
        let picked = edges.resolve(&self.kernel, shape)?;
        let mut pairs = Vec::with_capacity(picked.len());
        for edge in picked {
            let face = self
                .kernel
                .adjacent_face(shape, &edge)
                .context("no adjacent face for chamfer edge")?;
            pairs.push((edge, face));
        }
        let chamfered = self
            .kernel
            .chamfer(shape, distance, &pairs)
            .context("chamfer failed")?;
        self.current = Some(chamfered);
        Ok(())
    }

    // --- inspection ---

    /// Axis-aligned bounding box of the current object.
    pub fn bbox(&self) -> Result<BoundingBox> {
        let shape = self.current.as_ref().ok_or(Error::NoCurrentObject)?;
        Ok(self.kernel.bounding_box(shape)?)
    }

    /// Bounding box of an arbitrary shape handle.
    pub fn bbox_of(&self, shape: &K::Shape) -> Result<BoundingBox> {
        Ok(self.kernel.bounding_box(shape)?)
    }

    pub fn center_of_mass(&self) -> Result<Point3> {
        let shape = self.current.as_ref().ok_or(Error::NoCurrentObject)?;
        Ok(self.kernel.center_of_mass(shape)?)
    }

    /// One pass over the current object's edges. Sub-shapes reachable
    /// through several parents may appear more than once.
    pub fn edges(&self) -> Result<impl Iterator<Item = K::Edge>> {
        let shape = self.current.as_ref().ok_or(Error::NoCurrentObject)?;
        Ok(self.kernel.edges(shape)?.into_iter())
    }

    pub fn faces(&self) -> Result<impl Iterator<Item = K::Face>> {
        let shape = self.current.as_ref().ok_or(Error::NoCurrentObject)?;
        Ok(self.kernel.faces(shape)?.into_iter())
    }

    pub fn vertices(&self) -> Result<impl Iterator<Item = K::Vertex>> {
        let shape = self.current.as_ref().ok_or(Error::NoCurrentObject)?;
        Ok(self.kernel.vertices(shape)?.into_iter())
    }

    pub fn wires(&self) -> Result<impl Iterator<Item = K::Wire>> {
        let shape = self.current.as_ref().ok_or(Error::NoCurrentObject)?;
        Ok(self.kernel.wires(shape)?.into_iter())
    }

    // --- profile factories ---
    //
    // Pass-throughs that build sub-shape handles without touching the
    // accumulator; their results feed extrude/revolve/loft/pipe.

    pub fn vertex_at(&self, point: impl Into<Point3>) -> Result<K::Vertex> {
        Ok(self.kernel.make_vertex(point.into())?)
    }

    pub fn line(&self, p1: impl Into<Point3>, p2: impl Into<Point3>) -> Result<K::Edge> {
        Ok(self.kernel.make_line(p1.into(), p2.into())?)
    }

    /// Arc through three points: start, end, and a point on the arc.
    pub fn arc(
        &self,
        start: impl Into<Point3>,
        end: impl Into<Point3>,
        mid: impl Into<Point3>,
    ) -> Result<K::Edge> {
        Ok(self.kernel.make_arc(start.into(), end.into(), mid.into())?)
    }

    pub fn circle(
        &self,
        center: impl Into<Point3>,
        normal: impl Into<Vec3>,
        radius: f64,
    ) -> Result<K::Edge> {
        Ok(self
            .kernel
            .make_circle(center.into(), normal.into(), radius)?)
    }

    pub fn ellipse(
        &self,
        center: impl Into<Point3>,
        normal: impl Into<Vec3>,
        r_major: f64,
        r_minor: f64,
    ) -> Result<K::Edge> {
        Ok(self
            .kernel
            .make_ellipse(center.into(), normal.into(), r_major, r_minor)?)
    }

    pub fn helix(
        &self,
        pitch: f64,
        height: f64,
        radius: f64,
        cone_angle_deg: f64,
        left_handed: bool,
    ) -> Result<K::Edge> {
        Ok(self.kernel.make_helix(
            pitch,
            height,
            radius,
            cone_angle_deg.to_radians(),
            left_handed,
        )?)
    }

    pub fn wire(&self, edges: &[K::Edge]) -> Result<K::Wire> {
        Ok(self.kernel.make_wire(edges)?)
    }

    pub fn face(&self, outer: &K::Wire, holes: &[K::Wire]) -> Result<K::Face> {
        Ok(self.kernel.make_face(outer, holes)?)
    }

    // --- export ---

    /// Triangulate the current object at the default deflection and write
    /// binary STL.
    pub fn write_stl(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_stl_with(path, DEFAULT_DEFLECTION)
    }

    pub fn write_stl_with(&self, path: impl AsRef<Path>, deflection: f64) -> Result<()> {
        let shape = self.current.as_ref().ok_or(Error::NoCurrentObject)?;
        let mesh = self
            .kernel
            .triangulate(shape, deflection)
            .context("triangulation failed")?;
        export_stl(&mesh, path.as_ref()).context("STL export failed")?;
        Ok(())
    }
}
