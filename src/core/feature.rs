//! Feature definitions: which corpus tests make up each transform or polyfill.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// The corpus tests that together define one feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDefinition {
    tests: Vec<String>,
}

impl FeatureDefinition {
    /// Create a definition from test names.
    pub fn new<I, S>(tests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FeatureDefinition {
            tests: tests.into_iter().map(Into::into).collect(),
        }
    }

    /// The declared test names.
    pub fn tests(&self) -> &[String] {
        &self.tests
    }

    /// Whether a corpus test belongs to this feature.
    ///
    /// A single declared name also acts as a prefix, so `"DataView"` covers
    /// `"DataView (Int8)"` and `"DataView (UInt8)"`.
    pub fn matches(&self, test_name: &str) -> bool {
        if self.tests.iter().any(|t| t == test_name) {
            return true;
        }
        match self.tests.as_slice() {
            [only] => test_name.starts_with(only.as_str()),
            _ => false,
        }
    }
}

impl<'de> Deserialize<'de> for FeatureDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Single(String),
            List(Vec<String>),
            Object { features: Vec<String> },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Single(name) => FeatureDefinition::new([name]),
            Raw::List(names) | Raw::Object { features: names } => FeatureDefinition::new(names),
        })
    }
}

/// Feature name → definition, in canonical feature order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FeatureDefinitions(IndexMap<String, FeatureDefinition>);

impl FeatureDefinitions {
    /// Parse a definitions file.
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("failed to parse feature definitions")
    }

    /// Add a definition, keeping insertion order.
    pub fn insert(&mut self, name: impl Into<String>, definition: FeatureDefinition) {
        self.0.insert(name.into(), definition);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureDefinition)> {
        self.0.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
