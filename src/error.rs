// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Error types shared across the builder, kernels, and exporters

use thiserror::Error;

/// Result type for modeling operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A pending operation was fed no shape at all. Raised by the accumulator
    /// before any kernel combinator runs, so a silently failed constructor is
    /// caught at the point of misuse.
    #[error("no shape was supplied to the pending operation")]
    NullShape,

    /// A postfix mutator or query ran in a scope that has no current object.
    #[error("no current object in the active scope")]
    NoCurrentObject,

    /// An axis was requested between coincident points, or from a zero-length
    /// direction vector.
    #[error("degenerate axis: direction has zero length")]
    DegenerateAxis,

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// A failure reported by the geometry kernel. The taxonomy is the
    /// kernel's own; it is carried through as text with no local recovery.
    #[error("kernel error: {0}")]
    Kernel(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
