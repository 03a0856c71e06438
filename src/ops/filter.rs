//! Selection of transforms and polyfills for resolved targets.

use crate::core::compat::CompatMatrix;
use crate::core::targets::TargetSpec;
use crate::ops::requirement::is_required;
use crate::resolver::TargetError;

/// Selects names from a matrix given resolved targets and include/exclude
/// lists.
#[derive(Debug, Clone, Copy)]
pub struct InclusionFilter<'a> {
    targets: &'a TargetSpec,
    matrix: &'a CompatMatrix,
    defaults: &'a [&'a str],
}

impl<'a> InclusionFilter<'a> {
    pub fn new(targets: &'a TargetSpec, matrix: &'a CompatMatrix) -> Self {
        InclusionFilter {
            targets,
            matrix,
            defaults: &[],
        }
    }

    /// Names kept regardless of the targets, unless excluded.
    pub fn with_defaults(mut self, defaults: &'a [&'a str]) -> Self {
        self.defaults = defaults;
        self
    }

    /// Whether one candidate survives the filter.
    pub fn keep(&self, name: &str, exclude: &[String]) -> Result<bool, TargetError> {
        let excluded = exclude.iter().any(|e| e == name);
        if self.defaults.iter().any(|d| *d == name) {
            return Ok(!excluded);
        }
        Ok(!excluded && is_required(self.targets, self.matrix.get(name))?)
    }

    /// Filter `candidates` in order, then append `include` unconditionally.
    pub fn select<'n>(
        &self,
        candidates: impl IntoIterator<Item = &'n str>,
        include: &[String],
        exclude: &[String],
    ) -> Result<Vec<String>, TargetError> {
        let mut selected = Vec::new();

        for name in candidates {
            if self.keep(name, exclude)? {
                selected.push(name.to_string());
            } else {
                tracing::debug!(name, "not selected");
            }
        }
        selected.extend(include.iter().cloned());

        Ok(selected)
    }
}
