// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Binary STL output: byte layout and atomic replacement.

use std::fs;

use poc::io::export_stl;
use poc::{Builder, Point3, TraceKernel, TriangleMesh};

fn one_triangle() -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
    let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
    let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
    mesh.add_triangle([a, b, c]);
    mesh
}

#[test]
fn test_single_triangle_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tri.stl");
    export_stl(&one_triangle(), &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 84 + 50);
    assert!(bytes[..80].iter().all(|&b| b == 0));
    assert_eq!(&bytes[80..84], &1u32.to_le_bytes());

    // Normal is zeroed; first vertex is the origin.
    assert!(bytes[84..96].iter().all(|&b| b == 0));
    assert!(bytes[96..108].iter().all(|&b| b == 0));
    // Second vertex x = 1.0.
    assert_eq!(&bytes[108..112], &1.0f32.to_le_bytes());
    // Attribute byte count is zero.
    assert_eq!(&bytes[132..134], &[0, 0]);
}

#[test]
fn test_builder_export_of_trace_box() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("box.stl");

    let mut b = Builder::new(TraceKernel::new());
    b.cuboid([0.0, 0.0, 0.0], [10.0, 20.0, 30.0]).unwrap();
    b.write_stl(&path).unwrap();

    // The trace kernel triangulates to a 12-triangle bounding-box shell.
    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 84 + 50 * 12);
    assert_eq!(&bytes[80..84], &12u32.to_le_bytes());
}

#[test]
fn test_failed_export_leaves_destination_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keep.stl");
    fs::write(&path, b"precious").unwrap();

    let empty = TriangleMesh::new();
    assert!(export_stl(&empty, &path).is_err());

    assert_eq!(fs::read(&path).unwrap(), b"precious");
    assert!(!dir.path().join("keep.stl.tmp").exists());
}

#[test]
fn test_no_temp_file_left_after_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.stl");
    export_stl(&one_triangle(), &path).unwrap();

    assert!(path.exists());
    assert!(!dir.path().join("out.stl.tmp").exists());
}

#[test]
fn test_export_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.stl");
    fs::write(&path, b"stale").unwrap();

    export_stl(&one_triangle(), &path).unwrap();
    assert_eq!(fs::read(&path).unwrap().len(), 134);
}
