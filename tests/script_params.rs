// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! End-to-end script runs with parameter overrides.

use std::fs;

use poc::kernel::TraceShape;
use poc::{run_script, Params, TraceKernel};

#[test]
fn test_run_script_builds_and_returns_value() {
    let mut params = Params::new();
    params.set("width", poc::ParamValue::Float(25.0));

    let (builder, width) = run_script(TraceKernel::new(), &params, |b, p| {
        let width = p.number("width", 10.0);
        b.cuboid([0.0, 0.0, 0.0], [width, 10.0, 5.0])?;
        b.difference(|b| b.cylinder([5.0, 5.0, -1.0], [5.0, 5.0, 6.0], 2.0))?;
        Ok(width)
    })
    .unwrap();

    assert_eq!(width, 25.0);
    let bbox = builder.bbox().unwrap();
    assert_eq!(bbox.max.x, 25.0);
    assert!(matches!(
        builder.object().unwrap(),
        TraceShape::Boolean { .. }
    ));
}

#[test]
fn test_params_loaded_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.toml");
    fs::write(&path, "width = 42.0\nholes = 3\n").unwrap();

    let params = Params::from_file(&path).unwrap();
    assert_eq!(params.number("width", 0.0), 42.0);
    assert_eq!(params.integer("holes", 0), 3);
}

#[test]
fn test_params_loaded_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.json");
    fs::write(&path, r#"{"rounded": true, "label": "lid"}"#).unwrap();

    let params = Params::from_file(&path).unwrap();
    assert!(params.flag("rounded", false));
    assert_eq!(params.text("label", ""), "lid");
}

#[test]
fn test_missing_param_file_reports_path() {
    let err = Params::from_file("/nonexistent/overrides.toml").unwrap_err();
    assert!(err.to_string().contains("overrides.toml"));
}

#[test]
fn test_unsupported_param_extension_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.yaml");
    fs::write(&path, "width: 1\n").unwrap();

    assert!(Params::from_file(&path).is_err());
}

#[test]
fn test_script_failure_carries_context() {
    let err = run_script(TraceKernel::new(), &Params::new(), |b, _| {
        b.translate([1.0, 0.0, 0.0])
    })
    .unwrap_err();
    assert!(err.to_string().contains("script body failed"));
}
