//! `node: "engines"` support: the lowest known node version allowed by the
//! project's `package.json`.

use std::path::{Path, PathBuf};

use semver::VersionReq;

use crate::core::version::{format_number, parse_version_lenient};
use crate::resolver::errors::TargetError;
use crate::util::fs;

/// Manifest file read from the project root.
pub const PACKAGE_JSON: &str = "package.json";

/// Read `engines.node` from `<root>/package.json`.
pub fn engines_node_range(root: &Path) -> Result<(PathBuf, String), TargetError> {
    let path = root.join(PACKAGE_JSON);
    let manifest_error = |message: String| TargetError::ManifestLoad {
        path: path.clone(),
        message,
    };

    let contents = fs::read_to_string(&path).map_err(|e| manifest_error(format!("{:#}", e)))?;
    let manifest: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| manifest_error(e.to_string()))?;

    match manifest.pointer("/engines/node").and_then(|v| v.as_str()) {
        Some(range) => Ok((path, range.to_string())),
        None => Err(TargetError::MissingEngines { path }),
    }
}

/// Parse an npm-style range: `||`-separated alternatives, each a set of
/// comparators separated by whitespace or commas.
pub fn parse_range(range: &str) -> Result<Vec<VersionReq>, TargetError> {
    range
        .split("||")
        .map(|alternative| {
            let alternative = alternative.trim();
            let normalized = if alternative.is_empty() {
                "*".to_string()
            } else {
                comparators(alternative).join(", ")
            };
            VersionReq::parse(&normalized).map_err(|e| TargetError::InvalidEnginesRange {
                range: range.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Split one alternative into comparators, gluing a detached operator
/// (`>= 5`) onto the version that follows it. A hyphen range `A - B`
/// becomes `>=A, <=B`.
fn comparators(alternative: &str) -> Vec<String> {
    let tokens: Vec<&str> = alternative
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();

    if let [low, "-", high] = tokens.as_slice() {
        return vec![
            format!(">={}", strip_v(low)),
            format!("<={}", strip_v(high)),
        ];
    }

    let mut out = Vec::new();
    let mut pending_op = String::new();

    for token in tokens {
        if token.chars().all(is_operator) {
            pending_op.push_str(token);
        } else {
            out.push(format!("{}{}", pending_op, strip_v(token)));
            pending_op.clear();
        }
    }
    if !pending_op.is_empty() {
        out.push(pending_op);
    }

    out
}

fn is_operator(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '~' | '^')
}

/// Drop the `v` npm allows in front of a version (`v6`, `>=v6.5`).
fn strip_v(token: &str) -> String {
    let split = token.find(|c: char| !is_operator(c)).unwrap_or(token.len());
    let (op, version) = token.split_at(split);
    format!("{}{}", op, version.strip_prefix('v').unwrap_or(version))
}

/// Lowest of the `known` node versions satisfying `range`.
///
/// `known` must be sorted ascending.
pub fn min_satisfying(range: &str, known: &[f64]) -> Result<f64, TargetError> {
    let requirements = parse_range(range)?;

    known
        .iter()
        .copied()
        .find(|version| {
            parse_version_lenient(&format_number(*version))
                .is_some_and(|v| requirements.iter().any(|req| req.matches(&v)))
        })
        .ok_or_else(|| TargetError::NoEnginesMatch {
            range: range.to_string(),
            known: known.iter().map(|v| format_number(*v)).collect(),
        })
}

/// Resolve `node: "engines"` against a project root.
pub fn engines_node_version(root: &Path, known: &[f64]) -> Result<f64, TargetError> {
    let (path, range) = engines_node_range(root)?;
    let version = min_satisfying(&range, known)?;
    tracing::debug!(range = %range, version, "resolved node from {}", path.display());
    Ok(version)
}
