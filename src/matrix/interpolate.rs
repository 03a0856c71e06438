//! Gap-filling pass over raw corpus results.
//!
//! Environments that duplicate another (`node6_5` equals `chrome51`) receive
//! its results, and an environment missing a result inherits it from the
//! environment right before it when both share a product or engine family.
//! Results flow forward through the canonical order, so the pass must see
//! environments exactly in that order.

use crate::core::compat_test::{FeatureTest, RawResult, ResultSet};
use crate::core::environment::EnvironmentDescriptor;

/// Return a copy of `tests` with every result set interpolated over `envs`.
///
/// For tests with subtests only the subtest result sets are interpolated.
pub fn interpolate_tests(envs: &[EnvironmentDescriptor], tests: &[FeatureTest]) -> Vec<FeatureTest> {
    let mut tests = tests.to_vec();

    for test in &mut tests {
        match test.subtests.as_mut() {
            Some(subtests) => {
                for subtest in subtests {
                    interpolate_results(envs, &mut subtest.res);
                }
            }
            None => interpolate_results(envs, &mut test.res),
        }
    }

    tests
}

/// Fill one result set in place, sweeping `envs` in order.
fn interpolate_results(envs: &[EnvironmentDescriptor], res: &mut ResultSet) {
    let mut prev: Option<&EnvironmentDescriptor> = None;

    for env in envs {
        let has_own = res.contains_key(&env.id);

        match env.equals.as_deref() {
            Some(source) if !has_own => {
                if let Some(result) = res.get(source).cloned() {
                    let result = if env.ignore_flagged && result == RawResult::Flagged {
                        RawResult::Fail
                    } else {
                        result
                    };
                    res.insert(env.id.clone(), result);
                }
            }
            _ => {
                if let Some(prev) = prev.filter(|p| env.inherits_from(p)) {
                    if !has_own {
                        if let Some(result) = res.get(&prev.id).cloned() {
                            res.insert(env.id.clone(), result);
                        }
                    }
                }
            }
        }

        prev = Some(env);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compat_test::Subtest;

    fn results(pairs: &[(&str, RawResult)]) -> ResultSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn envs() -> Vec<EnvironmentDescriptor> {
        vec![
            EnvironmentDescriptor::new("chrome51", "Chrome 51"),
            EnvironmentDescriptor::new("node6_5", "Node.js 6.5").with_equals("chrome51", true),
            EnvironmentDescriptor::new("ie11", "Internet Explorer 11").with_family("Chakra"),
            EnvironmentDescriptor::new("edge12", "Edge 12").with_family("Chakra"),
            EnvironmentDescriptor::new("edge13", "Edge 13").with_family("Chakra"),
            EnvironmentDescriptor::new("firefox45", "Firefox 45"),
            EnvironmentDescriptor::new("firefox46", "Firefox 46, nightly"),
        ]
    }

    #[test]
    fn test_equals_copies_result() {
        let tests = vec![FeatureTest::new(
            "let",
            None,
            results(&[("chrome51", RawResult::Pass)]),
        )];

        let out = interpolate_tests(&envs(), &tests);
        assert_eq!(out[0].res.get("node6_5"), Some(&RawResult::Pass));
    }

    #[test]
    fn test_equals_discounts_flagged() {
        let tests = vec![FeatureTest::new(
            "let",
            None,
            results(&[("chrome51", RawResult::Flagged)]),
        )];

        let out = interpolate_tests(&envs(), &tests);
        assert_eq!(out[0].res.get("node6_5"), Some(&RawResult::Fail));
    }

    #[test]
    fn test_equals_keeps_own_result() {
        let tests = vec![FeatureTest::new(
            "let",
            None,
            results(&[("chrome51", RawResult::Pass), ("node6_5", RawResult::Fail)]),
        )];

        let out = interpolate_tests(&envs(), &tests);
        assert_eq!(out[0].res.get("node6_5"), Some(&RawResult::Fail));
    }

    #[test]
    fn test_family_propagates_forward_through_chain() {
        let tests = vec![FeatureTest::new(
            "const",
            None,
            results(&[("ie11", RawResult::Pass)]),
        )];

        let out = interpolate_tests(&envs(), &tests);
        assert_eq!(out[0].res.get("edge12"), Some(&RawResult::Pass));
        assert_eq!(out[0].res.get("edge13"), Some(&RawResult::Pass));
        assert_eq!(out[0].res.get("firefox45"), None);
    }

    #[test]
    fn test_base_name_match_ignores_qualifier() {
        let envs = vec![
            EnvironmentDescriptor::new("firefox46", "Firefox 46"),
            EnvironmentDescriptor::new("firefox46n", "Firefox 46, nightly"),
        ];
        let tests = vec![FeatureTest::new(
            "spread",
            None,
            results(&[("firefox46", RawResult::Strict)]),
        )];

        let out = interpolate_tests(&envs, &tests);
        assert_eq!(out[0].res.get("firefox46n"), Some(&RawResult::Strict));
    }

    #[test]
    fn test_subtests_interpolated_and_input_untouched() {
        let mut test = FeatureTest::new("Map", Some("built-ins"), ResultSet::new());
        test.subtests = Some(vec![Subtest {
            name: "basic functionality".to_string(),
            res: results(&[("chrome51", RawResult::Pass)]),
        }]);
        let tests = vec![test];

        let out = interpolate_tests(&envs(), &tests);
        let sub = &out[0].subtests.as_ref().unwrap()[0];
        assert_eq!(sub.res.get("node6_5"), Some(&RawResult::Pass));

        let original = &tests[0].subtests.as_ref().unwrap()[0];
        assert_eq!(original.res.get("node6_5"), None);
    }

    #[test]
    fn test_order_matters() {
        let forward = vec![
            EnvironmentDescriptor::new("edge12", "Edge 12").with_family("Chakra"),
            EnvironmentDescriptor::new("edge13", "Edge 13").with_family("Chakra"),
        ];
        let backward: Vec<_> = forward.iter().rev().cloned().collect();
        let tests = vec![FeatureTest::new(
            "const",
            None,
            results(&[("edge12", RawResult::Pass)]),
        )];

        assert_eq!(
            interpolate_tests(&forward, &tests)[0].res.get("edge13"),
            Some(&RawResult::Pass)
        );
        assert_eq!(interpolate_tests(&backward, &tests)[0].res.get("edge13"), None);
    }
}
