//! Preset assembly.
//!
//! Produces the ordered list of units a downstream compiler should run:
//! the module transform, then each selected syntax transform, then (with
//! built-ins enabled) the polyfill-require unit carrying the selected
//! polyfills.

use std::fmt::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::compat::{CompatData, CompatMatrix};
use crate::core::registry::{UnitHandle, UnitRegistry, POLYFILL_REQUIRE_UNIT};
use crate::core::targets::TargetSpec;
use crate::ops::filter::InclusionFilter;
use crate::ops::options::{normalize_options, ModuleSetting, PresetOptions, DEFAULT_INCLUDES};
use crate::ops::requirement::missing_targets;
use crate::resolver::TargetsResolver;
use crate::util::context::Session;

/// Transform whose presence tells the polyfill unit to pull in the
/// regenerator runtime.
pub const REGENERATOR_TRANSFORM: &str = "transform-regenerator";

/// Options passed to one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UnitOptions {
    Transform {
        loose: bool,
    },
    PolyfillRequire {
        polyfills: Vec<String>,
        regenerator: bool,
    },
}

/// One unit of the assembled preset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginEntry {
    pub unit: UnitHandle,
    pub options: UnitOptions,
}

/// The assembled preset.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    /// Resolved targets
    pub targets: TargetSpec,
    /// Module setting in effect
    pub modules: ModuleSetting,
    /// Selected syntax transforms, in order
    pub transformations: Vec<String>,
    /// Selected polyfills when built-ins are enabled
    pub polyfills: Option<Vec<String>>,
    /// Units to run, in order
    pub plugins: Vec<PluginEntry>,
    /// Debug report, rendered at most once per session
    pub debug_report: Option<String>,
}

/// Assemble a preset from options.
pub fn build_preset(
    options: &PresetOptions,
    data: &CompatData,
    resolver: TargetsResolver<'_>,
    session: &Session,
) -> Result<Preset> {
    let normalized = normalize_options(options, data)?;

    let targets = resolver
        .with_built_ins(normalized.use_built_ins)
        .resolve(&normalized.targets)
        .context("failed to resolve targets")?;
    tracing::debug!(targets = %targets.to_json(), "resolved targets");

    let transformations = InclusionFilter::new(&targets, &data.plugins).select(
        data.plugins.names(),
        &normalized.include.plugins,
        &normalized.exclude.plugins,
    )?;

    let polyfills = if normalized.use_built_ins {
        let candidates = data.built_ins.names().chain(DEFAULT_INCLUDES);
        let selected = InclusionFilter::new(&targets, &data.built_ins)
            .with_defaults(&DEFAULT_INCLUDES)
            .select(
                candidates,
                &normalized.include.built_ins,
                &normalized.exclude.built_ins,
            )?;
        Some(selected)
    } else {
        None
    };

    let plugins = assemble_units(
        &UnitRegistry::for_data(data),
        normalized.modules,
        &transformations,
        polyfills.as_deref(),
        normalized.loose,
    )?;

    let debug_report = if normalized.debug && !session.has_logged() {
        session.mark_logged();
        Some(render_debug_report(
            &targets,
            normalized.modules,
            &transformations,
            polyfills.as_deref(),
            data,
        ))
    } else {
        None
    };

    tracing::info!(
        transforms = transformations.len(),
        polyfills = polyfills.as_ref().map_or(0, Vec::len),
        "assembled preset"
    );

    Ok(Preset {
        targets,
        modules: normalized.modules,
        transformations,
        polyfills,
        plugins,
        debug_report,
    })
}

fn assemble_units(
    registry: &UnitRegistry,
    modules: ModuleSetting,
    transformations: &[String],
    polyfills: Option<&[String]>,
    loose: bool,
) -> Result<Vec<PluginEntry>> {
    let mut units = Vec::with_capacity(transformations.len() + 2);

    if let Some(format) = modules.format() {
        units.push(PluginEntry {
            unit: registry.module_unit(format)?.clone(),
            options: UnitOptions::Transform { loose },
        });
    }

    for name in transformations {
        units.push(PluginEntry {
            unit: registry.resolve(name)?.clone(),
            options: UnitOptions::Transform { loose },
        });
    }

    if let Some(polyfills) = polyfills {
        units.push(PluginEntry {
            unit: registry.resolve(POLYFILL_REQUIRE_UNIT)?.clone(),
            options: UnitOptions::PolyfillRequire {
                polyfills: polyfills.to_vec(),
                regenerator: transformations.iter().any(|t| t == REGENERATOR_TRANSFORM),
            },
        });
    }

    Ok(units)
}

/// Render the human-readable report of what was selected and why.
pub fn render_debug_report(
    targets: &TargetSpec,
    modules: ModuleSetting,
    transformations: &[String],
    polyfills: Option<&[String]>,
    data: &CompatData,
) -> String {
    let mut out = String::new();

    writeln!(out, "envpreset: `debug` option").unwrap();
    writeln!(out, "\nUsing targets:").unwrap();
    writeln!(
        out,
        "{}",
        serde_json::to_string_pretty(&targets.to_json()).unwrap_or_default()
    )
    .unwrap();
    writeln!(out, "\nModules transform: {}", modules).unwrap();

    writeln!(out, "\nUsing plugins:").unwrap();
    for name in transformations {
        write_entry(&mut out, name, targets, &data.plugins);
    }

    if let Some(polyfills) = polyfills.filter(|p| !p.is_empty()) {
        writeln!(out, "\nUsing polyfills:").unwrap();
        for name in polyfills {
            write_entry(&mut out, name, targets, &data.built_ins);
        }
    }

    out
}

fn write_entry(out: &mut String, name: &str, targets: &TargetSpec, matrix: &CompatMatrix) {
    let missing = missing_targets(targets, matrix.get(name));
    writeln!(out, "  {} {}", name, missing.to_json()).unwrap();
}
