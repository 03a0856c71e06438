//! The compiled compatibility matrix and its persisted artifacts.
//!
//! Two artifacts exist: `plugins.json` for syntax transforms and
//! `built-ins.json` for polyfilled built-ins. Each maps a feature name to the
//! lowest version of every environment that implements it.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::version::VersionToken;
use crate::util::fs;

/// File name of the syntax transform artifact.
pub const PLUGINS_FILE: &str = "plugins.json";

/// File name of the built-in polyfill artifact.
pub const BUILT_INS_FILE: &str = "built-ins.json";

const BUNDLED_PLUGINS: &str = include_str!("../../data/plugins.json");
const BUNDLED_BUILT_INS: &str = include_str!("../../data/built-ins.json");

/// Environment → minimum supported version for one feature.
///
/// An environment missing from the record never implemented the feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatRecord(IndexMap<String, VersionToken>);

impl CompatRecord {
    pub fn new() -> Self {
        CompatRecord(IndexMap::new())
    }

    /// Minimum supported version in an environment.
    pub fn get(&self, env: &str) -> Option<&VersionToken> {
        self.0.get(env)
    }

    /// Record a version, keeping the position of an existing entry.
    pub fn insert(&mut self, env: impl Into<String>, version: VersionToken) {
        self.0.insert(env.into(), version);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VersionToken)> {
        self.0.iter().map(|(env, v)| (env.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, VersionToken)> for CompatRecord {
    fn from_iter<I: IntoIterator<Item = (S, VersionToken)>>(iter: I) -> Self {
        CompatRecord(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Feature name → support record, in canonical feature order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatMatrix(IndexMap<String, CompatRecord>);

impl CompatMatrix {
    pub fn new() -> Self {
        CompatMatrix(IndexMap::new())
    }

    /// Parse a persisted artifact.
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("failed to parse compatibility matrix")
    }

    /// Load a persisted artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
            .with_context(|| format!("invalid compatibility data in {}", path.display()))
    }

    /// Serialize in the persisted layout: two-space indent, trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(self).context("failed to serialize compatibility matrix")?;
        out.push('\n');
        Ok(out)
    }

    /// Write the artifact to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write_string(path, &self.to_json_pretty()?)
    }

    pub fn insert(&mut self, name: impl Into<String>, record: CompatRecord) {
        self.0.insert(name.into(), record);
    }

    /// Support record for a feature.
    pub fn get(&self, name: &str) -> Option<&CompatRecord> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Feature names in canonical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CompatRecord)> {
        self.0.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Distinct released versions of `env` appearing anywhere, ascending.
    pub fn released_versions(&self, env: &str) -> Vec<f64> {
        let mut versions: Vec<f64> = self
            .0
            .values()
            .filter_map(|record| record.get(env))
            .filter_map(VersionToken::as_number)
            .collect();
        versions.sort_by(|a, b| a.total_cmp(b));
        versions.dedup();
        versions
    }
}

/// Both artifacts, as consumed at configuration time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompatData {
    /// Syntax transforms
    pub plugins: CompatMatrix,
    /// Built-in polyfills
    pub built_ins: CompatMatrix,
}

impl CompatData {
    /// The artifacts compiled into this binary.
    pub fn bundled() -> Result<Self> {
        Ok(CompatData {
            plugins: CompatMatrix::from_json(BUNDLED_PLUGINS)
                .context("bundled plugins.json is invalid")?,
            built_ins: CompatMatrix::from_json(BUNDLED_BUILT_INS)
                .context("bundled built-ins.json is invalid")?,
        })
    }

    /// Load the artifacts from a data directory.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(CompatData {
            plugins: CompatMatrix::load(&dir.join(PLUGINS_FILE))?,
            built_ins: CompatMatrix::load(&dir.join(BUILT_INS_FILE))?,
        })
    }

    /// Write both artifacts into a data directory.
    pub fn save(&self, dir: &Path) -> Result<()> {
        self.plugins.save(&dir.join(PLUGINS_FILE))?;
        self.built_ins.save(&dir.join(BUILT_INS_FILE))?;
        Ok(())
    }

    /// Distinct released node versions, optionally including built-ins.
    pub fn node_versions(&self, include_built_ins: bool) -> Vec<f64> {
        let mut versions = self.plugins.released_versions("node");
        if include_built_ins {
            versions.extend(self.built_ins.released_versions("node"));
            versions.sort_by(|a, b| a.total_cmp(b));
            versions.dedup();
        }
        versions
    }
}
