//! Electron ↔ Chromium version correspondence.

use std::cmp::Ordering;

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::core::version::{parse_float_prefix, parse_version_lenient};

const BUNDLED_TABLE: &str = include_str!("../../data/electron-to-chromium.json");

/// Maps each Electron release (`"1.4"`) to the Chromium major it bundles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElectronTable {
    /// Electron release → Chromium version
    releases: IndexMap<String, f64>,

    /// (chromium, electron) sorted ascending by chromium; one entry per
    /// chromium version, the newest Electron release that shipped it
    by_chromium: Vec<(f64, f64)>,
}

impl ElectronTable {
    /// Build from `(electron release, chromium version)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut releases = IndexMap::new();
        for (electron, chromium) in pairs {
            let chromium = parse_float_prefix(chromium).with_context(|| {
                format!("electron {} maps to non-numeric chromium `{}`", electron, chromium)
            })?;
            releases.insert(electron.to_string(), chromium.trunc());
        }
        Ok(Self::index(releases))
    }

    /// Parse the correspondence table (`{ "1.4": "53", ... }`).
    pub fn from_json(contents: &str) -> Result<Self> {
        let raw: IndexMap<String, String> =
            serde_json::from_str(contents).context("failed to parse electron-to-chromium table")?;
        Self::from_pairs(raw.iter().map(|(e, c)| (e.as_str(), c.as_str())))
    }

    /// The table compiled into this binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_TABLE).context("bundled electron-to-chromium.json is invalid")
    }

    fn index(releases: IndexMap<String, f64>) -> Self {
        let mut ordered: Vec<(&String, f64)> = releases.iter().map(|(e, c)| (e, *c)).collect();
        ordered.sort_by(|(ea, ca), (eb, cb)| {
            ca.total_cmp(cb).then_with(|| compare_releases(ea, eb))
        });

        let mut by_chromium: Vec<(f64, f64)> = Vec::with_capacity(ordered.len());
        for (electron, chromium) in ordered {
            let Some(electron) = parse_float_prefix(electron) else {
                continue;
            };
            match by_chromium.last_mut() {
                Some(last) if last.0 == chromium => last.1 = electron,
                _ => by_chromium.push((chromium, electron)),
            }
        }

        ElectronTable {
            releases,
            by_chromium,
        }
    }

    /// Chromium version bundled with an Electron `major.minor` release.
    pub fn chromium_for(&self, release: &str) -> Option<f64> {
        self.releases.get(release).copied()
    }

    /// Newest Electron release of the smallest Chromium at or above the
    /// given one.
    ///
    /// Returns `None` when `chromium` is newer than anything in the table.
    pub fn electron_for_chromium(&self, chromium: f64) -> Option<f64> {
        let (max, _) = self.by_chromium.last()?;
        if chromium > *max {
            return None;
        }

        self.by_chromium
            .iter()
            .find(|(c, _)| chromium <= *c)
            .map(|(_, electron)| *electron)
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

fn compare_releases(a: &str, b: &str) -> Ordering {
    match (parse_version_lenient(a), parse_version_lenient(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb),
        _ => a.cmp(b),
    }
}
