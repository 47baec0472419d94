// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Geometry module - triangle meshes and bounding boxes

mod bbox;
mod mesh;

pub use bbox::BoundingBox;
pub use mesh::TriangleMesh;
