//! Decide whether a feature still needs transforming for a set of targets.

use crate::core::compat::CompatRecord;
use crate::core::targets::{TargetSpec, TargetValue};
use crate::core::version::VersionToken;
use crate::resolver::TargetError;

/// Whether any targeted environment lacks the feature.
///
/// - no targets: always required
/// - environment missing from the record (or no record): required there
/// - otherwise required when the target predates the first supporting
///   version; an unreleased first version is newer than any target
///
/// Every target is expected to be resolved to a number.
pub fn is_required(targets: &TargetSpec, record: Option<&CompatRecord>) -> Result<bool, TargetError> {
    if targets.is_empty() {
        return Ok(true);
    }

    let mut required = false;
    for (env, value) in targets.iter() {
        let target = numeric_target(env, value)?;
        if required_in(record.and_then(|r| r.get(env)), target) {
            required = true;
        }
    }

    Ok(required)
}

/// Targets (by environment) the feature is still missing from.
///
/// Non-numeric targets are reported as missing rather than rejected; this is
/// only used for reporting.
pub fn missing_targets(targets: &TargetSpec, record: Option<&CompatRecord>) -> TargetSpec {
    targets
        .iter()
        .filter(|(env, value)| {
            let implemented = record.and_then(|r| r.get(env));
            match finite_number(value) {
                Some(target) => required_in(implemented, target),
                None => true,
            }
        })
        .map(|(env, value)| (env, value.clone()))
        .collect()
}

fn required_in(implemented: Option<&VersionToken>, target: f64) -> bool {
    implemented.map_or(true, |version| version.is_newer_than(target))
}

fn finite_number(value: &TargetValue) -> Option<f64> {
    value.as_number().filter(|n| n.is_finite())
}

fn numeric_target(env: &str, value: &TargetValue) -> Result<f64, TargetError> {
    finite_number(value).ok_or_else(|| TargetError::NonNumericVersion {
        env: env.to_string(),
        value: value.to_string(),
    })
}
