//! envpreset - decides which syntax transforms and polyfills a set of target
//! environments still needs.
//!
//! This crate provides the core library functionality for envpreset:
//! compiling the raw compatibility corpus into a feature matrix, resolving
//! declared targets, and selecting transforms and polyfills against them.

pub mod core;
pub mod matrix;
pub mod ops;
pub mod resolver;
pub mod util;

pub use core::{
    compat::CompatData, compat::CompatMatrix, compat::CompatRecord, electron::ElectronTable,
    registry::UnitRegistry, targets::TargetSpec, version::VersionToken,
};

pub use matrix::CompatibilityMatrixBuilder;
pub use resolver::TargetsResolver;
pub use util::context::Session;
