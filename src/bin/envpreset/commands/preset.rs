//! `envpreset preset` command implementation.

use anyhow::Result;

use envpreset::ops::{build_preset, ModulesOption, Preset, PresetOptions};
use envpreset::{ElectronTable, TargetsResolver};

use super::{browser_query, load_data, load_session, merge_targets, package_root, GlobalOpts};
use crate::cli::PresetArgs;

pub fn execute(args: PresetArgs, global: &GlobalOpts) -> Result<()> {
    let (session, config) = load_session(global, Some(&args.targets))?;
    let data = load_data(global, &config)?;
    let electron = ElectronTable::bundled()?;

    let mut options = config.preset;
    options.merge(cli_options(&args));
    options.targets = Some(merge_targets(options.targets.take(), &args.targets)?);

    let resolver = TargetsResolver::new(&data, &electron, &session)
        .with_query(browser_query())
        .with_root(package_root(&args.targets, &session));
    let preset = build_preset(&options, &data, resolver, &session)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&preset.plugins)?);
        return Ok(());
    }

    match &preset.debug_report {
        Some(report) => print!("{}", report),
        None => print_summary(&preset),
    }

    Ok(())
}

/// Options given on the command line. Flags left unset do not override the config.
fn cli_options(args: &PresetArgs) -> PresetOptions {
    let modules = args.modules.as_deref().map(|m| match m {
        "false" => ModulesOption::Enabled(false),
        other => ModulesOption::Format(other.to_string()),
    });

    PresetOptions {
        targets: None,
        modules,
        include: (!args.include.is_empty()).then(|| args.include.clone()),
        exclude: (!args.exclude.is_empty()).then(|| args.exclude.clone()),
        loose: args.loose.then_some(true),
        debug: args.debug.then_some(true),
        use_built_ins: args.targets.use_built_ins.then_some(true),
    }
}

fn print_summary(preset: &Preset) {
    println!("Modules transform: {}", preset.modules);

    println!("Transforms ({}):", preset.transformations.len());
    for name in &preset.transformations {
        println!("  {}", name);
    }

    if let Some(polyfills) = &preset.polyfills {
        println!("Polyfills ({}):", polyfills.len());
        for name in polyfills {
            println!("  {}", name);
        }
    }
}
