// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Grouping operations: nesting, finishing transforms, save/restore.

use poc::kernel::TraceShape;
use poc::{BooleanOp, Builder, Error, TraceKernel};

fn builder() -> Builder<TraceKernel> {
    Builder::new(TraceKernel::new())
}

#[test]
fn test_nested_scopes_merge_inside_out() {
    let mut b = builder();
    b.cuboid([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]).unwrap();
    b.union(|b| {
        b.difference(|b| {
            b.cuboid([2.0, 2.0, 2.0], [8.0, 8.0, 8.0])?;
            b.sphere([5.0, 5.0, 5.0], 1.0)
        })
    })
    .unwrap();

    // Fuse(seed, Cut(inner box, sphere))
    match b.object().unwrap() {
        TraceShape::Boolean { op, lhs, rhs } => {
            assert_eq!(*op, BooleanOp::Union);
            assert!(matches!(**lhs, TraceShape::Cuboid { .. }));
            assert!(matches!(
                **rhs,
                TraceShape::Boolean {
                    op: BooleanOp::Difference,
                    ..
                }
            ));
        }
        other => panic!("expected union, got {other:?}"),
    }
}

#[test]
fn test_finishing_transform_applies_before_merge() {
    let mut b = builder();
    b.cuboid([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]).unwrap();
    b.translated([20.0, 0.0, 0.0], |b| b.sphere([0.0, 0.0, 0.0], 2.0))
        .unwrap();

    // The sphere is translated as a sub-assembly, then fused; the seed is
    // untouched.
    match b.object().unwrap() {
        TraceShape::Boolean { op, lhs, rhs } => {
            assert_eq!(*op, BooleanOp::Union);
            assert!(matches!(**lhs, TraceShape::Cuboid { .. }));
            match &**rhs {
                TraceShape::Transformed { shape, .. } => {
                    assert!(matches!(**shape, TraceShape::Sphere { .. }));
                }
                other => panic!("expected transformed sphere, got {other:?}"),
            }
        }
        other => panic!("expected union, got {other:?}"),
    }
}

#[test]
fn test_scope_value_passes_through() {
    let mut b = builder();
    let volume_hint = b
        .union(|b| {
            b.cuboid([0.0, 0.0, 0.0], [2.0, 3.0, 4.0])?;
            Ok(2.0 * 3.0 * 4.0)
        })
        .unwrap();
    assert_eq!(volume_hint, 24.0);
}

#[test]
fn test_pending_operator_restored_after_scope() {
    let mut b = builder();
    b.union(|b| b.cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]))
        .unwrap();

    // The enclosing scope already consumed its seed slot on the merged
    // sub-object, so the next shape combines instead of replacing it.
    b.sphere([0.0, 0.0, 0.0], 1.0).unwrap();
    assert!(matches!(
        b.object().unwrap(),
        TraceShape::Boolean {
            op: BooleanOp::Union,
            ..
        }
    ));
}

#[test]
fn test_failed_body_still_merges_partial_sub_object() {
    let mut b = builder();
    b.cuboid([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]).unwrap();

    let err = b
        .difference::<()>(|b| {
            b.sphere([5.0, 5.0, 5.0], 2.0)?;
            anyhow::bail!("boom")
        })
        .unwrap_err();
    assert!(err.to_string().contains("boom"));

    // The partial sub-object (just the sphere) was still cut from the seed,
    // and the enclosing accumulator survived the failure.
    match b.object().unwrap() {
        TraceShape::Boolean { op, lhs, rhs } => {
            assert_eq!(*op, BooleanOp::Difference);
            assert!(matches!(**lhs, TraceShape::Cuboid { .. }));
            assert!(matches!(**rhs, TraceShape::Sphere { .. }));
        }
        other => panic!("expected difference, got {other:?}"),
    }

    b.sphere([0.0, 0.0, 0.0], 1.0).unwrap();
    assert!(matches!(b.object().unwrap(), TraceShape::Boolean { .. }));
}

#[test]
fn test_empty_scope_fails_and_leaves_state_untouched() {
    let mut b = builder();
    b.cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]).unwrap();
    let before = b.object().cloned();

    let err = b.union(|_| Ok(())).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::NullShape)
    ));
    assert_eq!(b.object().cloned(), before);
}

#[test]
fn test_finishing_transform_runs_even_when_body_fails() {
    let mut b = builder();
    b.cuboid([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]).unwrap();

    let err = b
        .translated([5.0, 0.0, 0.0], |b: &mut Builder<TraceKernel>| -> anyhow::Result<()> {
            b.sphere([0.0, 0.0, 0.0], 1.0)?;
            anyhow::bail!("boom")
        })
        .unwrap_err();
    assert!(err.to_string().contains("boom"));

    // The partial sub-object still got its translation before the merge.
    match b.object().unwrap() {
        TraceShape::Boolean { rhs, .. } => match &**rhs {
            TraceShape::Transformed { shape, .. } => {
                assert!(matches!(**shape, TraceShape::Sphere { .. }));
            }
            other => panic!("expected transformed sphere, got {other:?}"),
        },
        other => panic!("expected boolean, got {other:?}"),
    }
}
