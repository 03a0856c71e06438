//! Raw test results from the third-party compatibility corpus.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Outcome of one test in one environment-version.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    Pass,
    Fail,
    /// Works only behind a runtime flag
    Flagged,
    /// Works in strict mode only
    Strict,
    /// Annotated or otherwise unrecognized result
    Other,
}

impl RawResult {
    /// Whether this result credits the environment with the feature.
    ///
    /// Strict-only support counts: emitted code is assumed to run in strict
    /// mode. Flagged support does not.
    pub fn is_passing(&self) -> bool {
        matches!(self, RawResult::Pass | RawResult::Strict)
    }

    /// Whether the result is present and not an outright failure.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, RawResult::Fail)
    }
}

impl<'de> Deserialize<'de> for RawResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(true) => RawResult::Pass,
            Value::Bool(false) | Value::Null => RawResult::Fail,
            Value::String(s) if s == "flagged" => RawResult::Flagged,
            Value::String(s) if s == "strict" => RawResult::Strict,
            _ => RawResult::Other,
        })
    }
}

/// Results keyed by environment-version (`chrome51`, `safaritp`, `babel`),
/// in declaration order.
pub type ResultSet = IndexMap<String, RawResult>;

/// A named subtest of a composite test.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subtest {
    pub name: String,
    #[serde(default)]
    pub res: ResultSet,
}

/// A single test of the corpus.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureTest {
    pub name: String,

    /// `"built-ins"`, `"built-in extensions"`, `"syntax"`, ...
    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub res: ResultSet,

    /// Every subtest must pass for the test as a whole to pass
    #[serde(default)]
    pub subtests: Option<Vec<Subtest>>,
}

impl FeatureTest {
    /// Create a test with results and no subtests.
    pub fn new(name: impl Into<String>, category: Option<&str>, res: ResultSet) -> Self {
        FeatureTest {
            name: name.into(),
            category: category.map(str::to_string),
            res,
            subtests: None,
        }
    }

    /// Whether the test exercises a built-in API rather than syntax.
    pub fn is_built_in(&self) -> bool {
        matches!(
            self.category.as_deref(),
            Some("built-ins") | Some("built-in extensions")
        )
    }
}

/// One data file of the corpus (`es6`, `es2016plus`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestSuite {
    #[serde(default)]
    pub name: String,
    pub tests: Vec<FeatureTest>,
}

impl TestSuite {
    /// Parse a suite file, naming it explicitly.
    pub fn from_json(name: &str, contents: &str) -> Result<Self> {
        let mut suite: TestSuite = serde_json::from_str(contents)
            .with_context(|| format!("failed to parse test suite `{}`", name))?;
        suite.name = name.to_string();
        Ok(suite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_result_parsing() {
        let res: ResultSet = serde_json::from_str(
            r#"{ "babel": true, "chrome49": false, "node4": "flagged", "ie11": "strict", "edge13": { "val": true } }"#,
        )
        .unwrap();

        assert_eq!(res["babel"], RawResult::Pass);
        assert_eq!(res["chrome49"], RawResult::Fail);
        assert_eq!(res["node4"], RawResult::Flagged);
        assert_eq!(res["ie11"], RawResult::Strict);
        assert_eq!(res["edge13"], RawResult::Other);

        let keys: Vec<_> = res.keys().map(String::as_str).collect();
        assert_eq!(keys, ["babel", "chrome49", "node4", "ie11", "edge13"]);
    }

    #[test]
    fn test_passing_rules() {
        assert!(RawResult::Pass.is_passing());
        assert!(RawResult::Strict.is_passing());
        assert!(!RawResult::Flagged.is_passing());
        assert!(RawResult::Flagged.is_truthy());
        assert!(!RawResult::Fail.is_truthy());
    }

    #[test]
    fn test_suite_parsing() {
        let suite = TestSuite::from_json(
            "es6",
            r#"{ "tests": [
                { "name": "arrow functions", "category": "functions", "res": { "chrome47": true } },
                { "name": "Map", "category": "built-ins", "subtests": [
                    { "name": "basic functionality", "res": { "chrome38": true } }
                ] }
            ] }"#,
        )
        .unwrap();

        assert_eq!(suite.name, "es6");
        assert_eq!(suite.tests.len(), 2);
        assert!(!suite.tests[0].is_built_in());
        assert!(suite.tests[1].is_built_in());
        assert_eq!(suite.tests[1].subtests.as_ref().unwrap().len(), 1);
    }
}
