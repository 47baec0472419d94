// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Triangle mesh produced by kernel triangulation

use super::BoundingBox;
use crate::utils::math::{Mat4, Point3};
use serde::{Deserialize, Serialize};

/// Indexed triangle mesh.
///
/// This is the common currency between [`Kernel::triangulate`] and the STL
/// exporter. Normals are not stored; the binary STL layout leaves the normal
/// slot zeroed and consumers recompute from winding.
///
/// [`Kernel::triangulate`]: crate::kernel::Kernel::triangulate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3>,
    pub triangles: Vec<[usize; 3]>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, position: Point3) -> usize {
        let index = self.vertices.len();
        self.vertices.push(position);
        index
    }

    pub fn add_triangle(&mut self, indices: [usize; 3]) {
        self.triangles.push(indices);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Transform all vertices by a matrix
    pub fn transform(&mut self, matrix: &Mat4) {
        for vertex in &mut self.vertices {
            *vertex = matrix.transform_point(vertex);
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// A 12-triangle shell over a bounding box. An empty box gives an empty
    /// mesh.
    pub fn from_bounding_box(bbox: &BoundingBox) -> Self {
        if bbox.is_empty() {
            return Self::new();
        }

        let mut mesh = Self::with_capacity(8, 12);
        for corner in bbox.corners() {
            mesh.add_vertex(corner);
        }

        // Two triangles per face, outward winding
        let faces: [[usize; 3]; 12] = [
            [4, 5, 6],
            [4, 6, 7],
            [1, 0, 3],
            [1, 3, 2],
            [5, 1, 2],
            [5, 2, 6],
            [0, 4, 7],
            [0, 7, 3],
            [7, 6, 2],
            [7, 2, 3],
            [0, 1, 5],
            [0, 5, 4],
        ];
        for face in faces {
            mesh.add_triangle(face);
        }
        mesh
    }
}
