//! Compatibility matrix builder.
//!
//! Compiles the raw corpus (sparse per-environment test results) into the
//! dense feature → environment → minimum version table:
//!
//! 1. interpolate each suite over the environments enrolled in it
//! 2. flatten subtests into addressable tests
//! 3. score every feature in every scored environment
//! 4. add environments derived from Chrome

pub mod derive;
pub mod interpolate;
pub mod score;

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::compat::{CompatData, CompatMatrix, CompatRecord};
use crate::core::compat_test::{FeatureTest, TestSuite};
use crate::core::electron::ElectronTable;
use crate::core::environment::{EnvironmentList, UnreleasedLabels, SCORED_ENVIRONMENTS};
use crate::core::feature::{FeatureDefinition, FeatureDefinitions};
use crate::util::fs;

/// Environment table file name inside a corpus directory.
pub const ENVIRONMENTS_FILE: &str = "environments.json";

/// Suites read from a corpus directory, as `(suite name, file name)`.
pub const SUITE_FILES: [(&str, &str); 2] = [
    ("es6", "data-es6.json"),
    ("es2016plus", "data-es2016plus.json"),
];

const BUNDLED_PLUGIN_FEATURES: &str = include_str!("../../data/plugin-features.json");
const BUNDLED_BUILT_IN_FEATURES: &str = include_str!("../../data/built-in-features.json");
const BUNDLED_UNRELEASED_LABELS: &str = include_str!("../../data/unreleased-labels.json");

/// The raw corpus: environments plus test suites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pub environments: EnvironmentList,
    pub suites: Vec<TestSuite>,
}

impl Corpus {
    /// Load a corpus directory (`environments.json`, `data-es6.json`,
    /// `data-es2016plus.json`).
    pub fn load(dir: &Path) -> Result<Self> {
        let env_path = dir.join(ENVIRONMENTS_FILE);
        let environments = EnvironmentList::from_json(&fs::read_to_string(&env_path)?)
            .with_context(|| format!("invalid environment table {}", env_path.display()))?;

        let mut suites = Vec::with_capacity(SUITE_FILES.len());
        for (name, file) in SUITE_FILES {
            let path = dir.join(file);
            let suite = TestSuite::from_json(name, &fs::read_to_string(&path)?)
                .with_context(|| format!("invalid test suite {}", path.display()))?;
            suites.push(suite);
        }

        tracing::debug!(
            environments = environments.len(),
            suites = suites.len(),
            "loaded corpus from {}",
            dir.display()
        );

        Ok(Corpus {
            environments,
            suites,
        })
    }
}

/// Static inputs shipped with the tool rather than the corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildInputs {
    pub plugin_features: FeatureDefinitions,
    pub built_in_features: FeatureDefinitions,
    pub unreleased_labels: UnreleasedLabels,
    pub electron: ElectronTable,
}

impl BuildInputs {
    /// The feature definitions, labels and electron table bundled in `data/`.
    pub fn bundled() -> Result<Self> {
        Ok(BuildInputs {
            plugin_features: FeatureDefinitions::from_json(BUNDLED_PLUGIN_FEATURES)
                .context("bundled plugin-features.json is invalid")?,
            built_in_features: FeatureDefinitions::from_json(BUNDLED_BUILT_IN_FEATURES)
                .context("bundled built-in-features.json is invalid")?,
            unreleased_labels: UnreleasedLabels::from_json(BUNDLED_UNRELEASED_LABELS)
                .context("bundled unreleased-labels.json is invalid")?,
            electron: ElectronTable::bundled()?,
        })
    }
}

/// Compiles feature definitions against an interpolated corpus.
#[derive(Debug)]
pub struct CompatibilityMatrixBuilder<'a> {
    tests: Vec<FeatureTest>,
    unreleased_labels: &'a UnreleasedLabels,
    electron: &'a ElectronTable,
}

impl<'a> CompatibilityMatrixBuilder<'a> {
    /// Interpolate and flatten the corpus once, ready for scoring.
    pub fn new(corpus: &Corpus, unreleased_labels: &'a UnreleasedLabels, electron: &'a ElectronTable) -> Self {
        let mut tests = Vec::new();
        for suite in &corpus.suites {
            let envs = corpus.environments.for_suite(&suite.name);
            tests.extend(interpolate::interpolate_tests(&envs, &suite.tests));
        }

        CompatibilityMatrixBuilder {
            tests: score::flatten_tests(tests),
            unreleased_labels,
            electron,
        }
    }

    /// Support record for one feature.
    pub fn record_for(&self, definition: &FeatureDefinition) -> CompatRecord {
        let units = score::select_units(&self.tests, definition);
        let mut record = CompatRecord::new();

        for env in SCORED_ENVIRONMENTS {
            let label = self.unreleased_labels.get(env);
            if let Some(version) = score::lowest_implemented_version(&units, env, label) {
                record.insert(env, version);
            }
        }

        derive::add_derived_environments(&mut record, self.electron);
        record
    }

    /// Matrix for every definition, in definition order.
    pub fn build(&self, definitions: &FeatureDefinitions) -> CompatMatrix {
        let mut matrix = CompatMatrix::new();
        for (name, definition) in definitions.iter() {
            let record = self.record_for(definition);
            if record.is_empty() {
                tracing::debug!(feature = name, "not implemented in any scored environment");
            }
            matrix.insert(name, record);
        }
        matrix
    }
}

/// Build both artifacts from a corpus.
pub fn build_compat_data(corpus: &Corpus, inputs: &BuildInputs) -> CompatData {
    let builder = CompatibilityMatrixBuilder::new(corpus, &inputs.unreleased_labels, &inputs.electron);

    let data = CompatData {
        plugins: builder.build(&inputs.plugin_features),
        built_ins: builder.build(&inputs.built_in_features),
    };

    tracing::info!(
        plugins = data.plugins.len(),
        built_ins = data.built_ins.len(),
        "compiled compatibility matrix"
    );

    data
}
