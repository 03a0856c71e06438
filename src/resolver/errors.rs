//! Target resolution error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::resolver::browsers::BrowserQueryError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error while resolving targets or comparing them against the matrix.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum TargetError {
    #[error("could not determine the running node version: {message}")]
    #[diagnostic(code(envpreset::targets::current_node))]
    CurrentNode { message: String },

    #[error("running node reported an unparseable version `{version}`")]
    #[diagnostic(code(envpreset::targets::current_node))]
    InvalidNodeVersion { version: String },

    #[error("failed to load {}: {message}", .path.display())]
    #[diagnostic(code(envpreset::targets::manifest))]
    ManifestLoad { path: PathBuf, message: String },

    #[error("{} has no `engines.node` field", .path.display())]
    #[diagnostic(
        code(envpreset::targets::missing_engines),
        help("add `\"engines\": {{ \"node\": \">=6\" }}` to package.json")
    )]
    MissingEngines { path: PathBuf },

    #[error("invalid `engines.node` range `{range}`: {message}")]
    #[diagnostic(code(envpreset::targets::engines_range))]
    InvalidEnginesRange { range: String, message: String },

    #[error("no known node version satisfies `engines.node` range `{range}`")]
    #[diagnostic(code(envpreset::targets::engines_range))]
    NoEnginesMatch { range: String, known: Vec<String> },

    #[error("Electron version must be a semver version, got `{value}`")]
    #[diagnostic(code(envpreset::targets::electron))]
    ElectronNotSemver { value: String },

    #[error("Electron version {version} is either too old or too new")]
    #[diagnostic(
        code(envpreset::targets::electron),
        help("target an electron release listed in electron-to-chromium.json")
    )]
    UnknownElectron { version: String },

    #[error("`browsers` must be a query string or a list of queries, got `{value}`")]
    #[diagnostic(code(envpreset::targets::browsers))]
    InvalidBrowsersQuery { value: String },

    #[error(transparent)]
    #[diagnostic(code(envpreset::targets::browsers))]
    BrowserQuery(#[from] BrowserQueryError),

    #[error("Target version must be a number, '{value}' was given for '{env}'")]
    #[diagnostic(
        code(envpreset::targets::non_numeric),
        help("targets are compared numerically once resolved")
    )]
    NonNumericVersion { env: String, value: String },
}

impl TargetError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());

        match self {
            TargetError::CurrentNode { .. } | TargetError::InvalidNodeVersion { .. } => diag
                .with_suggestion("Pin the node target to a number, e.g. `node = 6.5`"),

            TargetError::ManifestLoad { path, .. } => diag.with_location(path),

            TargetError::MissingEngines { path } => diag
                .with_location(path)
                .with_suggestion(suggestions::ADD_ENGINES),

            TargetError::InvalidEnginesRange { .. } => diag
                .with_suggestion("Use a semver range such as `>=6` or `^6.5 || ^8`"),

            TargetError::NoEnginesMatch { known, .. } => {
                let diag = if known.is_empty() {
                    diag.with_context("the compatibility data lists no node versions")
                } else {
                    diag.with_context(format!("known node versions: {}", known.join(", ")))
                };
                diag.with_suggestion("Widen the `engines.node` range")
            }

            TargetError::ElectronNotSemver { .. } | TargetError::UnknownElectron { .. } => {
                diag.with_suggestion(suggestions::ELECTRON_RANGE)
            }

            TargetError::InvalidBrowsersQuery { .. } => diag
                .with_suggestion("Use a string such as `\"chrome 49, ie 11\"` or a list of entries"),

            TargetError::BrowserQuery(err) => diag.with_context(format!("query: {}", err.query)),

            TargetError::NonNumericVersion { env, .. } => diag
                .with_context(format!("`{}` was not resolved to a version", env))
                .with_suggestion(suggestions::NUMERIC_TARGET),
        }
    }
}
