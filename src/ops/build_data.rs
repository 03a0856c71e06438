//! `envpreset build-data`: compile the corpus into the matrix artifacts, or
//! verify that the artifacts on disk are current.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::compat::{CompatData, CompatMatrix, BUILT_INS_FILE, PLUGINS_FILE};
use crate::matrix::{build_compat_data, BuildInputs, Corpus};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs;

/// Message printed when check mode finds stale artifacts.
pub const STALE_MESSAGE: &str = "The newly generated plugin/built-in data does not match the current files. Re-run `envpreset build-data`.";

/// Options for `build-data`.
#[derive(Debug, Clone)]
pub struct BuildDataOptions {
    /// Raw corpus directory
    pub corpus: PathBuf,
    /// Directory holding `plugins.json` and `built-ins.json`
    pub out: PathBuf,
    /// Compare instead of writing
    pub check: bool,
}

/// One artifact that differs from its rebuilt form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleArtifact {
    pub path: PathBuf,
    /// Features added, removed or changed; empty when the file is missing
    pub features: Vec<String>,
    pub missing: bool,
}

/// Result of `build-data`.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildDataOutcome {
    /// Artifacts were written
    Written { plugins: usize, built_ins: usize },
    /// Check mode: artifacts match
    UpToDate,
    /// Check mode: artifacts differ
    Stale(Vec<StaleArtifact>),
}

impl BuildDataOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, BuildDataOutcome::Stale(_))
    }
}

/// Build (or check) the artifacts.
pub fn build_data(options: &BuildDataOptions, inputs: &BuildInputs) -> Result<BuildDataOutcome> {
    let corpus = Corpus::load(&options.corpus)
        .with_context(|| format!("failed to load corpus from {}", options.corpus.display()))?;
    let data = build_compat_data(&corpus, inputs);

    if options.check {
        return check_data(&data, &options.out);
    }

    fs::ensure_dir(&options.out)?;
    data.save(&options.out)?;
    tracing::info!("wrote {} and {} to {}", PLUGINS_FILE, BUILT_INS_FILE, options.out.display());

    Ok(BuildDataOutcome::Written {
        plugins: data.plugins.len(),
        built_ins: data.built_ins.len(),
    })
}

/// Compare freshly built data against the artifacts in `dir`.
pub fn check_data(data: &CompatData, dir: &Path) -> Result<BuildDataOutcome> {
    let mut stale = Vec::new();

    for (file, rebuilt) in [(PLUGINS_FILE, &data.plugins), (BUILT_INS_FILE, &data.built_ins)] {
        let path = dir.join(file);
        match fs::read_optional(&path)? {
            None => stale.push(StaleArtifact {
                path,
                features: Vec::new(),
                missing: true,
            }),
            Some(contents) => {
                let current = CompatMatrix::from_json(&contents)
                    .with_context(|| format!("invalid compatibility data in {}", path.display()))?;
                if current != *rebuilt {
                    stale.push(StaleArtifact {
                        features: changed_features(&current, rebuilt),
                        path,
                        missing: false,
                    });
                }
            }
        }
    }

    if stale.is_empty() {
        tracing::debug!("data in {} is current", dir.display());
        Ok(BuildDataOutcome::UpToDate)
    } else {
        Ok(BuildDataOutcome::Stale(stale))
    }
}

/// Names of features whose records differ between two matrices.
pub fn changed_features(current: &CompatMatrix, rebuilt: &CompatMatrix) -> Vec<String> {
    let mut changed: Vec<String> = rebuilt
        .iter()
        .filter(|(name, record)| current.get(name) != Some(*record))
        .map(|(name, _)| name.to_string())
        .collect();
    changed.extend(
        current
            .names()
            .filter(|name| !rebuilt.contains(name))
            .map(str::to_string),
    );
    changed
}

/// Diagnostic describing stale artifacts.
pub fn stale_diagnostic(stale: &[StaleArtifact]) -> Diagnostic {
    let mut diag = Diagnostic::error(STALE_MESSAGE);
    for artifact in stale {
        if artifact.missing {
            diag = diag.with_context(format!("{} does not exist", artifact.path.display()));
        } else {
            diag = diag.with_context(format!(
                "{}: {}",
                artifact.path.display(),
                artifact.features.join(", ")
            ));
        }
    }
    diag.with_suggestion(suggestions::STALE_DATA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compat::CompatRecord;
    use crate::core::version::VersionToken;
    use tempfile::TempDir;

    fn data() -> CompatData {
        let mut plugins = CompatMatrix::new();
        plugins.insert(
            "transform-es2015-classes",
            [("chrome", VersionToken::Number(46.0))].into_iter().collect::<CompatRecord>(),
        );
        CompatData {
            plugins,
            built_ins: CompatMatrix::new(),
        }
    }

    #[test]
    fn test_check_up_to_date() {
        let tmp = TempDir::new().unwrap();
        let data = data();
        data.save(tmp.path()).unwrap();

        assert_eq!(check_data(&data, tmp.path()).unwrap(), BuildDataOutcome::UpToDate);
    }

    #[test]
    fn test_check_reports_changed_features() {
        let tmp = TempDir::new().unwrap();
        data().save(tmp.path()).unwrap();

        let mut newer = data();
        newer.plugins.insert(
            "transform-es2015-classes",
            [("chrome", VersionToken::Number(49.0))].into_iter().collect::<CompatRecord>(),
        );

        let outcome = check_data(&newer, tmp.path()).unwrap();
        let BuildDataOutcome::Stale(stale) = outcome else {
            panic!("expected stale outcome");
        };
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].features, ["transform-es2015-classes"]);

        let output = stale_diagnostic(&stale).format(false);
        assert!(output.contains("does not match the current files"));
    }

    #[test]
    fn test_check_missing_files() {
        let tmp = TempDir::new().unwrap();
        let outcome = check_data(&data(), tmp.path()).unwrap();
        assert!(matches!(outcome, BuildDataOutcome::Stale(ref s) if s.len() == 2 && s[0].missing));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_changed_features_includes_removed() {
        let current = data().plugins;
        let rebuilt = CompatMatrix::new();
        assert_eq!(changed_features(&current, &rebuilt), ["transform-es2015-classes"]);
    }
}
