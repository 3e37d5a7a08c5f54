//! Library schema — the `mixin.json` / `mixin.yaml` metadata record.
//!
//! A flat key/value description of the library that owns the prototypes.
//! Loading is plain I/O plus serde; the quickstart block is validated by the
//! caller before rendering starts.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Base name of the schema file; `.json` is tried first, then `.yaml`.
pub const SCHEMA_BASENAME: &str = "mixin";

/// The full on-disk record. Only part of it feeds the renderer.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct LibrarySchema {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub contributors: Vec<Contributor>,
    #[serde(default)]
    pub repository: Option<Repository>,
    #[serde(default)]
    pub bugs: Option<Bugs>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub quick_start: Option<QuickStart>,
    #[serde(default)]
    pub license: String,
}

/// Canonical usage example bundled with the schema.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStart {
    pub prototype: String,
    pub component_name: String,
    #[serde(default)]
    pub comment: String,
    /// BTreeMap: flag iteration is lexicographic by name, so rendered output
    /// never depends on serialization order.
    #[serde(default)]
    pub flags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct Contributor {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct Repository {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct Bugs {
    #[serde(default)]
    pub url: String,
}

impl LibrarySchema {
    /// The quickstart block is a rendering precondition, not an option.
    pub fn require_quick_start(&self) -> Result<&QuickStart> {
        self.quick_start.as_ref().with_context(|| {
            format!("schema for '{}' is missing the quickStart section", self.name)
        })
    }
}

/// Load the schema from `<lib>/mixin.json`, falling back to `<lib>/mixin.yaml`.
pub fn load(lib_dir: &Path) -> Result<LibrarySchema> {
    let json_path = lib_dir.join(format!("{}.json", SCHEMA_BASENAME));
    if json_path.is_file() {
        let data = fs::read_to_string(&json_path)
            .with_context(|| format!("failed to read {}", json_path.display()))?;
        return serde_json::from_str(&data)
            .with_context(|| format!("failed to parse {}", json_path.display()));
    }

    let yaml_path = lib_dir.join(format!("{}.yaml", SCHEMA_BASENAME));
    if yaml_path.is_file() {
        let data = fs::read_to_string(&yaml_path)
            .with_context(|| format!("failed to read {}", yaml_path.display()))?;
        return serde_yaml::from_str(&data)
            .with_context(|| format!("failed to parse {}", yaml_path.display()));
    }

    bail!(
        "no {}.json or {}.yaml found in {}",
        SCHEMA_BASENAME,
        SCHEMA_BASENAME,
        lib_dir.display()
    );
}
