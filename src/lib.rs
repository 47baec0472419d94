// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Scope-based solid modeling scripts over pluggable CAD kernels.
//!
//! A script drives a [`Builder`]: primitive constructors feed shapes into a
//! single accumulated object, grouping operations open nested scopes with
//! their own boolean combinator, and postfix mutators (rotate, translate,
//! fillet, chamfer) rework the accumulated object in place. The finished
//! object exports to binary STL.
//!
//! All geometry is delegated through the [`Kernel`] trait. The in-tree
//! [`TraceKernel`] records constructions symbolically, which is enough to
//! dry-run scripts and test them without a B-rep kernel:
//!
//! ```
//! use poc::{Builder, EdgeSelector, TraceKernel};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut b = Builder::new(TraceKernel::new());
//!
//! // A plate with a rounded boss, minus a bolt hole.
//! b.cuboid([0.0, 0.0, 0.0], [40.0, 40.0, 5.0])?;
//! b.union(|b| {
//!     b.cylinder([20.0, 20.0, 5.0], [20.0, 20.0, 15.0], 8.0)?;
//!     b.fillet(1.0, EdgeSelector::All)
//! })?;
//! b.difference(|b| b.cylinder([20.0, 20.0, -1.0], [20.0, 20.0, 16.0], 3.0))?;
//!
//! let bbox = b.bbox()?;
//! assert_eq!(bbox.max.x, 40.0);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod geometry;
pub mod io;
pub mod kernel;
mod scope;
pub mod script;
pub mod select;
pub mod utils;

pub use builder::Builder;
pub use error::{Error, Result};
pub use geometry::{BoundingBox, TriangleMesh};
pub use io::DEFAULT_DEFLECTION;
pub use kernel::{BooleanOp, Kernel, LoftSection, TraceKernel, DEFAULT_LOFT_TOLERANCE};
pub use script::{run_script, ParamValue, Params};
pub use select::EdgeSelector;
pub use utils::math::{Axis3, Mat4, Point3, Vec3};
