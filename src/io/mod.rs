// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Mesh export

mod stl;

pub use stl::export_stl;

/// Default chordal deflection for triangulating shapes before export
pub const DEFAULT_DEFLECTION: f64 = 0.05;
