//! Core data structures for envpreset.
//!
//! This module contains the foundational types used throughout the crate:
//! - Raw corpus data (environments, tests, feature definitions)
//! - The compiled compatibility matrix and version tokens
//! - Target specifications
//! - The unit registry consumed by preset assembly

pub mod compat;
pub mod compat_test;
pub mod electron;
pub mod environment;
pub mod feature;
pub mod registry;
pub mod targets;
pub mod version;

pub use compat::{CompatData, CompatMatrix, CompatRecord};
pub use compat_test::{FeatureTest, RawResult, ResultSet, Subtest, TestSuite};
pub use electron::ElectronTable;
pub use environment::{EnvironmentDescriptor, EnvironmentList, UnreleasedLabels};
pub use feature::{FeatureDefinition, FeatureDefinitions};
pub use registry::{ModuleFormat, UnitHandle, UnitKind, UnitRegistry};
pub use targets::{TargetSpec, TargetValue};
pub use version::VersionToken;
