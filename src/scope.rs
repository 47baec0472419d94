// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Scope frames - save/restore discipline for grouping operations

use crate::builder::{Builder, PendingOp};
use crate::error::Result;
use crate::kernel::{BooleanOp, Kernel};

/// Guard over one grouping operation.
///
/// On entry the enclosing (current object, pending operator) pair is saved
/// and a fresh empty accumulator seeded with the scope's combinator is
/// installed. [`ScopeFrame::exit`] restores the pair and feeds the finished
/// sub-object to the restored accumulator. If the frame is dropped without
/// an explicit exit (an unwinding panic in the scope body), the saved pair
/// is still restored; the partial sub-object is discarded.
pub(crate) struct ScopeFrame<'a, K: Kernel> {
    builder: &'a mut Builder<K>,
    held_current: Option<K::Shape>,
    held_pending: Option<PendingOp>,
}

impl<'a, K: Kernel> ScopeFrame<'a, K> {
    pub(crate) fn enter(builder: &'a mut Builder<K>, op: BooleanOp) -> Self {
        let held_current = builder.current.take();
        let held_pending = std::mem::replace(&mut builder.pending, PendingOp::Seeding(op));
        Self {
            builder,
            held_current,
            held_pending: Some(held_pending),
        }
    }

    pub(crate) fn builder(&mut self) -> &mut Builder<K> {
        self.builder
    }

    /// Restore the enclosing accumulator and merge the scope's finished
    /// object into it. An empty scope merges nothing and fails with
    /// [`Error::NullShape`](crate::Error::NullShape).
    pub(crate) fn exit(mut self) -> Result<()> {
        let sub = self.builder.current.take();
        self.restore();
        log::debug!("scope exit: merging sub-object into enclosing accumulator");
        self.builder.do_op(sub)
    }

    fn restore(&mut self) {
        if let Some(pending) = self.held_pending.take() {
            self.builder.current = self.held_current.take();
            self.builder.pending = pending;
        }
    }
}

impl<K: Kernel> Drop for ScopeFrame<'_, K> {
    fn drop(&mut self) {
        self.restore();
    }
}
