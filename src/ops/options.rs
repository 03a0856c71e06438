//! Preset option validation.
//!
//! Raw options come from config files or the command line with every field
//! optional. Normalization fills defaults, checks include/exclude names
//! against the known units, and splits those names into plugins and
//! built-ins.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::compat::CompatData;
use crate::core::registry::ModuleFormat;
use crate::core::targets::TargetSpec;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Polyfills always selected unless explicitly excluded.
pub const DEFAULT_INCLUDES: [&str; 3] = ["web.timers", "web.immediate", "web.dom.iterable"];

/// Prefix that may be written in front of plugin names.
const PLUGIN_PREFIX: &str = "babel-plugin-";

/// The `modules` option as written: a format token, or `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModulesOption {
    Enabled(bool),
    Format(String),
}

/// Validated module setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleSetting {
    Disabled,
    Format(ModuleFormat),
}

impl ModuleSetting {
    pub fn format(&self) -> Option<ModuleFormat> {
        match self {
            ModuleSetting::Disabled => None,
            ModuleSetting::Format(format) => Some(*format),
        }
    }
}

impl std::fmt::Display for ModuleSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleSetting::Disabled => f.write_str("false"),
            ModuleSetting::Format(format) => write!(f, "{}", format),
        }
    }
}

/// Preset options as configured. Unset fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetOptions {
    /// Minimum environment versions to support
    pub targets: Option<TargetSpec>,

    /// Module format transform
    pub modules: Option<ModulesOption>,

    /// Units always selected
    pub include: Option<Vec<String>>,

    /// Units never selected
    pub exclude: Option<Vec<String>>,

    /// Pass `loose` to every transform
    pub loose: Option<bool>,

    /// Render the debug report
    pub debug: Option<bool>,

    /// Select polyfills as well as transforms
    #[serde(alias = "useBuiltIns")]
    pub use_built_ins: Option<bool>,
}

impl PresetOptions {
    /// Merge another set of options into this one (other takes precedence).
    pub fn merge(&mut self, other: PresetOptions) {
        if other.targets.is_some() {
            self.targets = other.targets;
        }
        if other.modules.is_some() {
            self.modules = other.modules;
        }
        if other.include.is_some() {
            self.include = other.include;
        }
        if other.exclude.is_some() {
            self.exclude = other.exclude;
        }
        if other.loose.is_some() {
            self.loose = other.loose;
        }
        if other.debug.is_some() {
            self.debug = other.debug;
        }
        if other.use_built_ins.is_some() {
            self.use_built_ins = other.use_built_ins;
        }
    }
}

/// Include or exclude names split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSets {
    /// Every name, in given order
    pub all: Vec<String>,
    /// Names of syntax transforms
    pub plugins: Vec<String>,
    /// Names of polyfills (`es6.*`, `es7.*`, `web.*`)
    pub built_ins: Vec<String>,
}

static BUILT_IN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(es\d+|web)\.").unwrap());

/// Split names into plugins and built-ins by the `^(es\d+|web)\.` pattern.
pub fn partition_names(names: &[String]) -> NameSets {
    let (built_ins, plugins): (Vec<String>, Vec<String>) =
        names.iter().cloned().partition(|name| BUILT_IN_NAME.is_match(name));

    NameSets {
        all: names.to_vec(),
        plugins,
        built_ins,
    }
}

/// Options with defaults applied and names validated.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOptions {
    pub targets: TargetSpec,
    pub modules: ModuleSetting,
    pub include: NameSets,
    pub exclude: NameSets,
    pub loose: bool,
    pub debug: bool,
    pub use_built_ins: bool,
}

/// Error in preset options.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("invalid `modules` option `{value}`")]
    InvalidModules { value: String },

    #[error("invalid {option} names: {}", .names.join(", "))]
    UnknownNames { option: &'static str, names: Vec<String> },

    #[error("names cannot appear in both include and exclude: {}", .names.join(", "))]
    Conflicting { names: Vec<String> },
}

impl OptionsError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            OptionsError::InvalidModules { .. } => diag.with_context(format!(
                "expected one of {} or false",
                ModuleFormat::ALL.map(|f| format!("`{}`", f)).join(", ")
            )),
            OptionsError::UnknownNames { .. } => diag.with_suggestion(suggestions::LIST_NAMES),
            OptionsError::Conflicting { .. } => {
                diag.with_suggestion("Remove each name from either include or exclude")
            }
        }
    }
}

/// Strip the `babel-plugin-` prefix written in front of a name.
pub fn normalize_plugin_name(name: &str) -> String {
    name.strip_prefix(PLUGIN_PREFIX).unwrap_or(name).to_string()
}

/// Whether a name can appear in include/exclude.
fn is_known_name(name: &str, data: &CompatData) -> bool {
    data.plugins.contains(name)
        || data.built_ins.contains(name)
        || DEFAULT_INCLUDES.contains(&name)
        || ModuleFormat::ALL.iter().any(|f| f.unit_name() == name)
}

fn validate_names(
    option: &'static str,
    names: Option<&[String]>,
    data: &CompatData,
) -> Result<Vec<String>, OptionsError> {
    let names: Vec<String> = names
        .unwrap_or_default()
        .iter()
        .map(|name| normalize_plugin_name(name))
        .collect();

    let unknown: Vec<String> = names
        .iter()
        .filter(|name| !is_known_name(name, data))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(OptionsError::UnknownNames {
            option,
            names: unknown,
        });
    }

    Ok(names)
}

fn validate_modules(modules: Option<&ModulesOption>) -> Result<ModuleSetting, OptionsError> {
    match modules {
        None => Ok(ModuleSetting::Format(ModuleFormat::CommonJs)),
        Some(ModulesOption::Enabled(false)) => Ok(ModuleSetting::Disabled),
        Some(ModulesOption::Enabled(true)) => Err(OptionsError::InvalidModules {
            value: "true".to_string(),
        }),
        Some(ModulesOption::Format(value)) => value
            .parse()
            .map(ModuleSetting::Format)
            .map_err(|_| OptionsError::InvalidModules {
                value: value.clone(),
            }),
    }
}

/// Apply defaults and validate.
pub fn normalize_options(options: &PresetOptions, data: &CompatData) -> Result<NormalizedOptions, OptionsError> {
    let include = validate_names("include", options.include.as_deref(), data)?;
    let exclude = validate_names("exclude", options.exclude.as_deref(), data)?;

    let mut conflicting: Vec<String> = include
        .iter()
        .filter(|name| exclude.contains(name))
        .cloned()
        .collect();
    conflicting.dedup();
    if !conflicting.is_empty() {
        return Err(OptionsError::Conflicting { names: conflicting });
    }

    Ok(NormalizedOptions {
        targets: options.targets.clone().unwrap_or_default(),
        modules: validate_modules(options.modules.as_ref())?,
        include: partition_names(&include),
        exclude: partition_names(&exclude),
        loose: options.loose.unwrap_or(false),
        debug: options.debug.unwrap_or(false),
        use_built_ins: options.use_built_ins.unwrap_or(false),
    })
}
