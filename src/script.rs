// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Script execution - parameter overrides and the run entry point
//!
//! Scripts are compiled closures over a [`Builder`]; there is no custom
//! grammar. [`Params`] carries the keyword-override channel: named scalar
//! values loaded from a TOML or JSON file (or built in code) that scripts
//! consult for dimensions, counts, and feature toggles.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::Builder;
use crate::kernel::Kernel;

/// One override value: a flag, a number, or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Named scalar overrides for a script run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) -> &mut Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric override, coercing integers to floats. Falls back to
    /// `default` when the name is absent.
    pub fn number(&self, name: &str, default: f64) -> f64 {
        match self.0.get(name) {
            Some(ParamValue::Float(v)) => *v,
            Some(ParamValue::Int(v)) => *v as f64,
            _ => default,
        }
    }

    pub fn integer(&self, name: &str, default: i64) -> i64 {
        match self.0.get(name) {
            Some(ParamValue::Int(v)) => *v,
            _ => default,
        }
    }

    pub fn flag(&self, name: &str, default: bool) -> bool {
        match self.0.get(name) {
            Some(ParamValue::Bool(v)) => *v,
            _ => default,
        }
    }

    pub fn text<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.0.get(name) {
            Some(ParamValue::Text(v)) => v,
            _ => default,
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid TOML parameter table")
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("invalid JSON parameter object")
    }

    /// Load overrides from a `.toml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading parameter file {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => bail!("unsupported parameter file extension: {}", path.display()),
        }
    }
}

/// Run a script body against a fresh builder.
///
/// Returns the builder, holding whatever shape the body accumulated, along
/// with the body's own result value.
pub fn run_script<K, R>(
    kernel: K,
    params: &Params,
    body: impl FnOnce(&mut Builder<K>, &Params) -> Result<R>,
) -> Result<(Builder<K>, R)>
where
    K: Kernel,
{
    let mut builder = Builder::new(kernel);
    log::debug!("running script with {} parameter overrides", params.0.len());
    let value = body(&mut builder, params).context("script body failed")?;
    Ok((builder, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_overrides() {
        let params = Params::from_toml_str(
            r#"
            width = 30.0
            holes = 4
            rounded = true
            label = "bracket"
            "#,
        )
        .unwrap();
        assert_eq!(params.number("width", 0.0), 30.0);
        assert_eq!(params.integer("holes", 0), 4);
        assert!(params.flag("rounded", false));
        assert_eq!(params.text("label", ""), "bracket");
    }

    #[test]
    fn test_json_integer_coerces_to_number() {
        let params = Params::from_json_str(r#"{"depth": 5}"#).unwrap();
        assert_eq!(params.number("depth", 0.0), 5.0);
    }

    #[test]
    fn test_defaults_for_missing_names() {
        let params = Params::new();
        assert_eq!(params.number("width", 12.5), 12.5);
        assert!(!params.flag("rounded", false));
        assert_eq!(params.text("label", "plate"), "plate");
    }
}
