//! Per-feature, per-environment minimum version scoring.

use crate::core::compat_test::{FeatureTest, ResultSet};
use crate::core::feature::FeatureDefinition;
use crate::core::version::{parse_float_prefix, VersionToken};

/// Result key carrying the reference implementation's own verdict.
const REFERENCE_KEY: &str = "babel";

/// One independently scored result set belonging to a feature.
#[derive(Debug, Clone, Copy)]
pub struct ScoringUnit<'a> {
    pub name: &'a str,
    pub res: &'a ResultSet,
    pub is_built_in: bool,
}

/// Flatten tests so subtests are also addressable as `"<parent> / <subtest>"`.
///
/// The renamed copies carry no category of their own.
pub fn flatten_tests(tests: Vec<FeatureTest>) -> Vec<FeatureTest> {
    let mut flat = Vec::with_capacity(tests.len());

    for test in tests {
        let renamed: Vec<FeatureTest> = test
            .subtests
            .iter()
            .flatten()
            .map(|sub| {
                FeatureTest::new(format!("{} / {}", test.name, sub.name), None, sub.res.clone())
            })
            .collect();
        flat.push(test);
        flat.extend(renamed);
    }

    flat
}

/// Select the scoring units of a feature from the flattened corpus.
pub fn select_units<'a>(tests: &'a [FeatureTest], definition: &FeatureDefinition) -> Vec<ScoringUnit<'a>> {
    tests
        .iter()
        .filter(|test| definition.matches(&test.name))
        .flat_map(|test| {
            let is_built_in = test.is_built_in();
            match &test.subtests {
                Some(subtests) => subtests
                    .iter()
                    .map(|sub| ScoringUnit {
                        name: &sub.name,
                        res: &sub.res,
                        is_built_in,
                    })
                    .collect::<Vec<_>>(),
                None => vec![ScoringUnit {
                    name: &test.name,
                    res: &test.res,
                    is_built_in,
                }],
            }
        })
        .collect()
}

/// Lowest version of `env` implementing every unit, or `None` if any unit
/// never qualifies there (or the feature has no units at all).
pub fn lowest_implemented_version(
    units: &[ScoringUnit<'_>],
    env: &str,
    unreleased_label: Option<&str>,
) -> Option<VersionToken> {
    let mut lowest: Option<VersionToken> = None;

    for unit in units {
        let version = unit_minimum(unit, env, unreleased_label)?;
        lowest = match lowest {
            Some(current) if current >= version => Some(current),
            _ => Some(version),
        };
    }

    lowest
}

/// First qualifying version of one unit in `env`.
fn unit_minimum(unit: &ScoringUnit<'_>, env: &str, unreleased_label: Option<&str>) -> Option<VersionToken> {
    if unit.is_built_in
        && !unit
            .res
            .get(REFERENCE_KEY)
            .is_some_and(|result| result.is_truthy())
    {
        tracing::trace!(unit = unit.name, env, "built-in lacks reference verdict");
        return None;
    }

    ordered_keys(unit.res, env, unreleased_label)
        .into_iter()
        .filter(|key| key.starts_with(env))
        .filter(|key| unit.res.get(*key).is_some_and(|result| result.is_passing()))
        .find_map(|key| {
            let normalized = key.replacen('_', ".", 1);
            let token = normalized.strip_prefix(env).unwrap_or(&normalized);

            if unreleased_label == Some(token) {
                return Some(VersionToken::Unreleased(token.to_string()));
            }
            parse_float_prefix(token).map(VersionToken::Number)
        })
}

/// Result keys in declaration order, except that the unreleased key of
/// `env` is moved right after the latest released key of `env`.
fn ordered_keys<'a>(res: &'a ResultSet, env: &str, unreleased_label: Option<&str>) -> Vec<&'a str> {
    let mut keys: Vec<&str> = res.keys().map(String::as_str).collect();

    let Some(label) = unreleased_label else {
        return keys;
    };
    let unreleased_key = format!("{}{}", env, label);
    let Some(unreleased_pos) = keys.iter().position(|k| *k == unreleased_key) else {
        return keys;
    };
    let Some(latest) = latest_released_key(&keys, env, label) else {
        return keys;
    };

    let moved = keys.remove(unreleased_pos);
    if let Some(latest_pos) = keys.iter().position(|k| *k == latest) {
        keys.insert(latest_pos + 1, moved);
    }
    keys
}

fn latest_released_key<'a>(keys: &[&'a str], env: &str, label: &str) -> Option<&'a str> {
    let mut latest: Option<(&str, f64)> = None;

    for key in keys {
        let Some(suffix) = key.strip_prefix(env) else {
            continue;
        };
        if suffix == label {
            continue;
        }
        let Some(version) = parse_float_prefix(suffix) else {
            continue;
        };
        if latest.map_or(true, |(_, current)| version > current) {
            latest = Some((*key, version));
        }
    }

    latest.map(|(key, _)| key)
}
