//! Unit registry - static lookup of transform and polyfill units.
//!
//! Every selectable name resolves to a `UnitHandle` once, when the registry
//! is built. Downstream consumers instantiate the actual transforms from
//! these handles; nothing is looked up by constructing names at call time.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::compat::CompatData;

/// Name of the unit that rewrites polyfill imports into individual requires.
pub const POLYFILL_REQUIRE_UNIT: &str = "transform-polyfill-require";

/// What kind of unit a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    /// A syntax transform selected from the plugin matrix
    Transform,
    /// A module-format transform
    Module,
    /// The polyfill-require rewriter
    PolyfillRequire,
}

/// Module output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    Amd,
    #[serde(rename = "commonjs")]
    CommonJs,
    #[serde(rename = "systemjs")]
    SystemJs,
    Umd,
}

impl ModuleFormat {
    pub const ALL: [ModuleFormat; 4] = [
        ModuleFormat::Amd,
        ModuleFormat::CommonJs,
        ModuleFormat::SystemJs,
        ModuleFormat::Umd,
    ];

    /// Name of the format token.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleFormat::Amd => "amd",
            ModuleFormat::CommonJs => "commonjs",
            ModuleFormat::SystemJs => "systemjs",
            ModuleFormat::Umd => "umd",
        }
    }

    /// Name of the transform unit producing this format.
    pub fn unit_name(&self) -> &'static str {
        match self {
            ModuleFormat::Amd => "transform-es2015-modules-amd",
            ModuleFormat::CommonJs => "transform-es2015-modules-commonjs",
            ModuleFormat::SystemJs => "transform-es2015-modules-systemjs",
            ModuleFormat::Umd => "transform-es2015-modules-umd",
        }
    }
}

impl FromStr for ModuleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "invalid module format '{}'; expected 'amd', 'commonjs', 'systemjs', 'umd' or false",
                    s
                )
            })
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a registered unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UnitHandle {
    name: String,
    kind: UnitKind,
}

impl UnitHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }
}

/// Error returned when a name has no registered unit.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no transform unit registered for `{0}`")]
pub struct UnknownUnit(pub String);

/// Registry of every unit a preset can select.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: IndexMap<String, UnitHandle>,
}

impl UnitRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        UnitRegistry {
            units: IndexMap::new(),
        }
    }

    /// Create a registry with the module transforms, the polyfill-require
    /// unit and one transform per plugin in the data.
    pub fn for_data(data: &CompatData) -> Self {
        let mut registry = UnitRegistry::new();

        for format in ModuleFormat::ALL {
            registry.register(format.unit_name(), UnitKind::Module);
        }
        registry.register(POLYFILL_REQUIRE_UNIT, UnitKind::PolyfillRequire);
        for name in data.plugins.names() {
            registry.register(name, UnitKind::Transform);
        }

        registry
    }

    /// Register a unit. Re-registering a name replaces it.
    pub fn register(&mut self, name: impl Into<String>, kind: UnitKind) {
        let name = name.into();
        self.units.insert(name.clone(), UnitHandle { name, kind });
    }

    /// Get a unit by name.
    pub fn get(&self, name: &str) -> Option<&UnitHandle> {
        self.units.get(name)
    }

    /// Resolve a name, failing if it is not registered.
    pub fn resolve(&self, name: &str) -> Result<&UnitHandle, UnknownUnit> {
        self.get(name).ok_or_else(|| UnknownUnit(name.to_string()))
    }

    /// Module transform unit for a format.
    pub fn module_unit(&self, format: ModuleFormat) -> Result<&UnitHandle, UnknownUnit> {
        self.resolve(format.unit_name())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
