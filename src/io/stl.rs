// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Binary STL writer
//!
//! Layout: an 80-byte zeroed header, a little-endian u32 triangle count,
//! then one 50-byte record per triangle (zeroed normal, three vertices as
//! f32 triples, zeroed attribute word). Output lands in `<path>.tmp` first
//! and is renamed over the destination only after a complete write, so an
//! existing file at `path` is never left half-written.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::TriangleMesh;

const HEADER_LEN: usize = 80;
const TRIANGLE_RECORD_LEN: usize = 50;

/// Write `mesh` to `path` as binary STL.
pub fn export_stl(mesh: &TriangleMesh, path: &Path) -> Result<()> {
    validate(mesh)?;

    let tmp_path = {
        let mut p = OsString::from(path.as_os_str());
        p.push(".tmp");
        p
    };

    let file = File::create(&tmp_path)?;
    let mut out = BufWriter::new(file);
    if let Err(err) = write_body(mesh, &mut out).and_then(|_| Ok(out.flush()?)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    drop(out);

    fs::rename(&tmp_path, path)?;
    log::info!(
        "wrote {} triangles to {}",
        mesh.triangle_count(),
        path.display()
    );
    Ok(())
}

fn validate(mesh: &TriangleMesh) -> Result<()> {
    if mesh.is_empty() {
        return Err(Error::InvalidMesh("mesh has no triangles".into()));
    }
    let n = mesh.vertex_count();
    for (i, tri) in mesh.triangles.iter().enumerate() {
        if tri.iter().any(|&v| v >= n) {
            return Err(Error::InvalidMesh(format!(
                "triangle {i} references a vertex out of range (have {n} vertices)"
            )));
        }
    }
    Ok(())
}

fn write_body(mesh: &TriangleMesh, out: &mut impl Write) -> Result<()> {
    out.write_all(&[0u8; HEADER_LEN])?;

    let count = u32::try_from(mesh.triangle_count())
        .map_err(|_| Error::InvalidMesh("too many triangles for binary STL".into()))?;
    out.write_all(&count.to_le_bytes())?;

    let mut record = [0u8; TRIANGLE_RECORD_LEN];
    for tri in &mesh.triangles {
        // Normal left zeroed; consumers recompute it from the winding.
        let mut offset = 12;
        for &vi in tri {
            let v = mesh.vertices[vi];
            for coord in [v.x, v.y, v.z] {
                record[offset..offset + 4].copy_from_slice(&(coord as f32).to_le_bytes());
                offset += 4;
            }
        }
        out.write_all(&record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::math::Point3;

    fn one_triangle() -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_triangle([a, b, c]);
        mesh
    }

    #[test]
    fn test_record_layout() {
        let mut buf = Vec::new();
        write_body(&one_triangle(), &mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_LEN + 4 + TRIANGLE_RECORD_LEN);
        assert!(buf[..HEADER_LEN].iter().all(|&b| b == 0));
        assert_eq!(&buf[HEADER_LEN..HEADER_LEN + 4], &1u32.to_le_bytes());
        // Second vertex of the triangle starts after the normal and the
        // first vertex: 84 + 12 + 12.
        assert_eq!(&buf[108..112], &1.0f32.to_le_bytes());
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let err = validate(&TriangleMesh::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidMesh(_)));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut mesh = one_triangle();
        mesh.triangles.push([0, 1, 99]);
        assert!(matches!(validate(&mesh), Err(Error::InvalidMesh(_))));
    }
}
