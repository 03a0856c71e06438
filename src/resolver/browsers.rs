//! Browser query resolution.
//!
//! A browser query expands into `"<browser> <version>"` entries, which are
//! then reduced to the lowest integer version per known browser family.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::targets::{TargetSpec, TargetValue};

/// Error reported by a browser query collaborator.
///
/// Surfaced to the user exactly as produced.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct BrowserQueryError {
    /// The query that failed
    pub query: String,
    /// Collaborator message
    pub message: String,
}

impl BrowserQueryError {
    pub fn new(query: impl Into<String>, message: impl Into<String>) -> Self {
        BrowserQueryError {
            query: query.into(),
            message: message.into(),
        }
    }
}

/// Expands browser queries into `"<browser> <version>"` entries.
pub trait BrowserQuery {
    fn resolve(&self, queries: &[String]) -> Result<Vec<String>, BrowserQueryError>;
}

/// Accepts only literal `"<browser> <version>"` entries.
///
/// Entries may be comma separated inside one query string. Anything that is
/// not a literal entry (`"last 2 versions"`, `"> 1%"`) is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralBrowserQuery;

impl BrowserQuery for LiteralBrowserQuery {
    fn resolve(&self, queries: &[String]) -> Result<Vec<String>, BrowserQueryError> {
        let mut entries = Vec::new();

        for query in queries {
            for part in query.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let mut words = part.split_whitespace();
                let (Some(name), Some(version), None) = (words.next(), words.next(), words.next())
                else {
                    return Err(unknown_query(part));
                };

                let name_ok = name.chars().all(|c| c.is_ascii_alphabetic() || c == '_');
                let version_ok = version.starts_with(|c: char| c.is_ascii_digit())
                    && version.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-');
                if !name_ok || !version_ok {
                    return Err(unknown_query(part));
                }

                entries.push(format!("{} {}", name.to_ascii_lowercase(), version));
            }
        }

        Ok(entries)
    }
}

/// Resolves full browserslist queries (`"last 2 versions"`, `"> 1%"`,
/// `"defaults"`) against the caniuse data bundled with `browserslist-rs`.
#[cfg(feature = "browserslist")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserslistQuery;

#[cfg(feature = "browserslist")]
impl BrowserQuery for BrowserslistQuery {
    fn resolve(&self, queries: &[String]) -> Result<Vec<String>, BrowserQueryError> {
        let distribs = browserslist::resolve(queries, &browserslist::Opts::default())
            .map_err(|e| BrowserQueryError::new(queries.join(", "), e.to_string()))?;

        Ok(distribs
            .iter()
            .map(|d| format!("{} {}", d.name(), d.version()))
            .collect())
    }
}

fn unknown_query(part: &str) -> BrowserQueryError {
    BrowserQueryError::new(part, format!("Unknown browser query `{}`", part))
}

/// Target environment for a browser name reported by a query.
fn family_for(browser: &str) -> Option<&'static str> {
    match browser {
        "chrome" => Some("chrome"),
        "edge" => Some("edge"),
        "firefox" => Some("firefox"),
        "ie" => Some("ie"),
        "ios_saf" => Some("ios"),
        "safari" => Some("safari"),
        _ => None,
    }
}

/// Leading integer of a version (`"10.0-10.2"` yields 10).
fn parse_int_prefix(version: &str) -> Option<u64> {
    let digits: String = version.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Lowest integer version per known browser family.
///
/// Unknown browsers and unparseable versions are skipped.
pub fn lowest_versions(entries: &[String]) -> BTreeMap<String, f64> {
    let mut lowest: BTreeMap<String, f64> = BTreeMap::new();

    for entry in entries {
        let mut parts = entry.split(' ');
        let (Some(name), Some(version)) = (parts.next(), parts.next()) else {
            continue;
        };
        let (Some(family), Some(version)) = (family_for(name), parse_int_prefix(version)) else {
            tracing::trace!(entry = %entry, "skipping browser entry");
            continue;
        };

        let version = version as f64;
        lowest
            .entry(family.to_string())
            .and_modify(|current| *current = current.min(version))
            .or_insert(version);
    }

    lowest
}

/// Combine query-derived versions with explicit targets.
///
/// Every explicit key except `browsers` overrides the query result.
pub fn merge_browsers(from_query: BTreeMap<String, f64>, explicit: &TargetSpec) -> TargetSpec {
    let mut merged: TargetSpec = from_query.into_iter().map(|(k, v)| (k, TargetValue::Number(v))).collect();

    for (env, value) in explicit.iter() {
        if env != "browsers" {
            merged.insert(env, value.clone());
        }
    }

    merged
}
