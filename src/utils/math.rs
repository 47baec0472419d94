// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Math helpers - axes and affine transforms over nalgebra f64 types

use crate::error::{Error, Result};
use nalgebra::{Unit, UnitQuaternion};

/// 3D point type used throughout the crate
pub type Point3 = nalgebra::Point3<f64>;
/// 3D vector type used throughout the crate
pub type Vec3 = nalgebra::Vector3<f64>;
/// Homogeneous 4x4 transform
pub type Mat4 = nalgebra::Matrix4<f64>;

/// Minimum direction norm accepted when normalizing an axis
pub const AXIS_EPSILON: f64 = 1e-12;

/// An oriented axis: origin plus unit direction.
///
/// Primitives that take two endpoints (cylinder, cone, torus, revolve) are
/// expressed to the kernel as an axis plus a length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis3 {
    pub origin: Point3,
    pub dir: Unit<Vec3>,
}

impl Axis3 {
    pub fn new(origin: Point3, dir: Vec3) -> Result<Self> {
        let dir = Unit::try_new(dir, AXIS_EPSILON).ok_or(Error::DegenerateAxis)?;
        Ok(Self { origin, dir })
    }

    /// Axis from `p1` toward `p2`, together with the distance between them.
    /// Coincident endpoints are rejected.
    pub fn between(p1: Point3, p2: Point3) -> Result<(Self, f64)> {
        let v = p2 - p1;
        let length = v.norm();
        Ok((Self::new(p1, v)?, length))
    }

    pub fn direction(&self) -> Vec3 {
        self.dir.into_inner()
    }
}

/// Rotation of `angle_rad` around `axis` passing through `center`.
pub fn rotation_about(angle_rad: f64, axis: Vec3, center: Point3) -> Result<Mat4> {
    let axis = Unit::try_new(axis, AXIS_EPSILON).ok_or(Error::DegenerateAxis)?;
    let rotation = UnitQuaternion::from_axis_angle(&axis, angle_rad).to_homogeneous();
    Ok(Mat4::new_translation(&center.coords) * rotation * Mat4::new_translation(&(-center.coords)))
}

/// Translation by `delta`.
pub fn translation(delta: Vec3) -> Mat4 {
    Mat4::new_translation(&delta)
}

/// Affine transform from three 4-wide rows; the bottom row is fixed to
/// `[0, 0, 0, 1]`.
pub fn matrix_from_rows(rows: [[f64; 4]; 3]) -> Mat4 {
    Mat4::new(
        rows[0][0], rows[0][1], rows[0][2], rows[0][3],
        rows[1][0], rows[1][1], rows[1][2], rows[1][3],
        rows[2][0], rows[2][1], rows[2][2], rows[2][3],
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Rotation-only transform from three 3-wide rows; translation is zero.
pub fn matrix_from_rows3(rows: [[f64; 3]; 3]) -> Mat4 {
    matrix_from_rows([
        [rows[0][0], rows[0][1], rows[0][2], 0.0],
        [rows[1][0], rows[1][1], rows[1][2], 0.0],
        [rows[2][0], rows[2][1], rows[2][2], 0.0],
    ])
}
