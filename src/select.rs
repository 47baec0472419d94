// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Edge selection for fillet and chamfer

use crate::error::Result;
use crate::kernel::Kernel;

/// Which edges a fillet or chamfer applies to.
///
/// Selection is resolved once into a concrete edge list against the current
/// shape before the kernel operation runs.
pub enum EdgeSelector<'a, K: Kernel + ?Sized> {
    /// Every edge yielded by the topology walk
    All,
    /// Edges for which the predicate returns true. The predicate receives
    /// the kernel so it can run inspection queries on candidate edges.
    Predicate(Box<dyn Fn(&K, &K::Edge) -> bool + 'a>),
    /// Exactly these edges
    List(Vec<K::Edge>),
}

impl<'a, K: Kernel + ?Sized> EdgeSelector<'a, K> {
    pub fn matching(predicate: impl Fn(&K, &K::Edge) -> bool + 'a) -> Self {
        Self::Predicate(Box::new(predicate))
    }

    /// Resolve into the concrete edge list for `shape`.
    pub fn resolve(self, kernel: &K, shape: &K::Shape) -> Result<Vec<K::Edge>> {
        match self {
            Self::All => kernel.edges(shape),
            Self::Predicate(predicate) => Ok(kernel
                .edges(shape)?
                .into_iter()
                .filter(|edge| predicate(kernel, edge))
                .collect()),
            Self::List(edges) => Ok(edges),
        }
    }
}
