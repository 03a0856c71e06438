//! Target specifications: the minimum environment versions a build supports.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::version::format_number;

/// A declared target value.
///
/// Before resolution this may hold tokens such as `"current"`, `"engines"`
/// or a browser query; after resolution every value should be a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl TargetValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TargetValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TargetValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for TargetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetValue::Bool(b) => write!(f, "{}", b),
            TargetValue::Number(n) => write!(f, "{}", format_number(*n)),
            TargetValue::Text(s) => write!(f, "{}", s),
            TargetValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<f64> for TargetValue {
    fn from(n: f64) -> Self {
        TargetValue::Number(n)
    }
}

impl From<&str> for TargetValue {
    fn from(s: &str) -> Self {
        TargetValue::Text(s.to_string())
    }
}

/// Environment → target value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSpec(BTreeMap<String, TargetValue>);

impl TargetSpec {
    pub fn new() -> Self {
        TargetSpec(BTreeMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, env: impl Into<String>, value: impl Into<TargetValue>) -> Self {
        self.insert(env, value);
        self
    }

    pub fn insert(&mut self, env: impl Into<String>, value: impl Into<TargetValue>) {
        self.0.insert(env.into(), value.into());
    }

    pub fn get(&self, env: &str) -> Option<&TargetValue> {
        self.0.get(env)
    }

    pub fn remove(&mut self, env: &str) -> Option<TargetValue> {
        self.0.remove(env)
    }

    pub fn contains(&self, env: &str) -> bool {
        self.0.contains_key(env)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TargetValue)> {
        self.0.iter().map(|(env, value)| (env.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON rendering for reports, with whole numbers written as integers.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .0
            .iter()
            .map(|(env, value)| {
                let json = match value {
                    TargetValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                        serde_json::Value::from(*n as i64)
                    }
                    TargetValue::Number(n) => serde_json::Value::from(*n),
                    TargetValue::Bool(b) => serde_json::Value::from(*b),
                    TargetValue::Text(s) => serde_json::Value::from(s.as_str()),
                    TargetValue::List(items) => serde_json::Value::from(items.clone()),
                };
                (env.clone(), json)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<TargetValue>> FromIterator<(K, V)> for TargetSpec {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        TargetSpec(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
