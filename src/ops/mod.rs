//! High-level operations.
//!
//! This module contains the implementation of envpreset commands.

pub mod build_data;
pub mod filter;
pub mod options;
pub mod preset;
pub mod requirement;

pub use build_data::{build_data, check_data, BuildDataOptions, BuildDataOutcome, StaleArtifact};
pub use filter::InclusionFilter;
pub use options::{
    normalize_options, partition_names, ModuleSetting, ModulesOption, NameSets, NormalizedOptions,
    OptionsError, PresetOptions, DEFAULT_INCLUDES,
};
pub use preset::{build_preset, render_debug_report, PluginEntry, Preset, UnitOptions};
pub use requirement::{is_required, missing_targets};
