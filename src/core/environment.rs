//! Runtime environments and their canonical ordering.
//!
//! The raw corpus declares environments as a keyed table whose declaration
//! order carries meaning: the interpolation pass copies results forward from
//! each environment to the next. That order is captured here as an explicit
//! sequence so it never depends on map iteration.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

/// Environments the matrix builder scores directly, in output order.
pub const SCORED_ENVIRONMENTS: [&str; 10] = [
    "chrome", "opera", "edge", "firefox", "safari", "node", "ie", "android", "ios", "phantom",
];

/// One entry of the raw environment table (e.g. `firefox52`, `node6_5`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnvironmentDescriptor {
    /// Environment-version key, e.g. `chrome51`
    #[serde(skip)]
    pub id: String,

    /// Full display name, e.g. `Firefox 52` or `Edge 14, Chakra`
    pub full: String,

    /// Engine family shared across products (e.g. `Chakra`)
    #[serde(default)]
    pub family: Option<String>,

    /// Key of another environment whose results this one duplicates
    #[serde(default)]
    pub equals: Option<String>,

    /// When copying from `equals`, turn `"flagged"` results into failures
    #[serde(default)]
    pub ignore_flagged: bool,

    /// Test suites this environment takes part in (all suites when absent)
    #[serde(default)]
    pub test_suites: Option<Vec<String>>,
}

impl EnvironmentDescriptor {
    /// Create a descriptor with just an id and full name.
    pub fn new(id: impl Into<String>, full: impl Into<String>) -> Self {
        EnvironmentDescriptor {
            id: id.into(),
            full: full.into(),
            family: None,
            equals: None,
            ignore_flagged: false,
            test_suites: None,
        }
    }

    /// Set the engine family.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Declare this environment equal to another.
    pub fn with_equals(mut self, equals: impl Into<String>, ignore_flagged: bool) -> Self {
        self.equals = Some(equals.into());
        self.ignore_flagged = ignore_flagged;
        self
    }

    /// Restrict this environment to the given suites.
    pub fn with_test_suites(mut self, suites: &[&str]) -> Self {
        self.test_suites = Some(suites.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Full name without a trailing `, qualifier`.
    pub fn base_name(&self) -> &str {
        match self.full.find(',') {
            Some(idx) if idx + 1 < self.full.len() => &self.full[..idx],
            _ => &self.full,
        }
    }

    /// Whether this environment takes part in a test suite.
    pub fn in_suite(&self, suite: &str) -> bool {
        match &self.test_suites {
            Some(suites) => suites.iter().any(|s| s == suite),
            None => true,
        }
    }

    /// Whether results may be inherited from `prev`, the environment
    /// immediately before this one in canonical order.
    pub fn inherits_from(&self, prev: &EnvironmentDescriptor) -> bool {
        if prev.base_name() == self.base_name() {
            return true;
        }
        self.family.is_some() && prev.family == self.family
    }
}

/// The canonical, ordered list of environments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentList {
    environments: Vec<EnvironmentDescriptor>,
}

impl EnvironmentList {
    /// Create a list from descriptors already in canonical order.
    pub fn new(environments: Vec<EnvironmentDescriptor>) -> Self {
        EnvironmentList { environments }
    }

    /// Parse the raw environment table, keeping declaration order.
    pub fn from_json(contents: &str) -> Result<Self> {
        let table: IndexMap<String, EnvironmentDescriptor> =
            serde_json::from_str(contents).context("failed to parse environment table")?;

        let environments = table
            .into_iter()
            .map(|(id, mut env)| {
                env.id = id;
                env
            })
            .collect();

        Ok(EnvironmentList { environments })
    }

    /// Environments enrolled in a suite, in canonical order.
    pub fn for_suite(&self, suite: &str) -> Vec<EnvironmentDescriptor> {
        self.environments
            .iter()
            .filter(|env| env.in_suite(suite))
            .cloned()
            .collect()
    }

    /// Iterate in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &EnvironmentDescriptor> {
        self.environments.iter()
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}

/// Per-environment unreleased build labels, e.g. `safari` → `tp`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct UnreleasedLabels(BTreeMap<String, String>);

impl UnreleasedLabels {
    /// Parse the label table.
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("failed to parse unreleased labels")
    }

    /// Build from `(environment, label)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        UnreleasedLabels(
            pairs
                .into_iter()
                .map(|(env, label)| (env.to_string(), label.to_string()))
                .collect(),
        )
    }

    /// Label for an environment, if it has one.
    pub fn get(&self, env: &str) -> Option<&str> {
        self.0.get(env).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_strips_qualifier() {
        let env = EnvironmentDescriptor::new("edge14", "Edge 14, Chakra");
        assert_eq!(env.base_name(), "Edge 14");

        let plain = EnvironmentDescriptor::new("firefox52", "Firefox 52");
        assert_eq!(plain.base_name(), "Firefox 52");
    }

    #[test]
    fn test_inherits_by_family() {
        let ie11 = EnvironmentDescriptor::new("ie11", "Internet Explorer 11").with_family("Chakra");
        let edge12 = EnvironmentDescriptor::new("edge12", "Edge 12").with_family("Chakra");
        let firefox = EnvironmentDescriptor::new("firefox45", "Firefox 45");

        assert!(edge12.inherits_from(&ie11));
        assert!(!firefox.inherits_from(&edge12));
        assert!(!edge12.inherits_from(&firefox));
    }

    #[test]
    fn test_from_json_keeps_declaration_order() {
        let list = EnvironmentList::from_json(
            r#"{
                "node6": { "full": "Node.js 6" },
                "chrome51": { "full": "Chrome 51", "test_suites": ["es6"] },
                "node6_5": { "full": "Node.js 6.5", "equals": "chrome51", "ignore_flagged": true }
            }"#,
        )
        .unwrap();

        let ids: Vec<_> = list.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["node6", "chrome51", "node6_5"]);

        let es2016: Vec<_> = list.for_suite("es2016plus").into_iter().map(|e| e.id).collect();
        assert_eq!(es2016, ["node6", "node6_5"]);
        assert!(list.iter().nth(2).unwrap().ignore_flagged);
    }

    #[test]
    fn test_unreleased_labels() {
        let labels = UnreleasedLabels::from_json(r#"{ "safari": "tp" }"#).unwrap();
        assert_eq!(labels.get("safari"), Some("tp"));
        assert_eq!(labels.get("chrome"), None);
    }
}
