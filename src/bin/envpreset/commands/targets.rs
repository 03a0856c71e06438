//! `envpreset targets` command implementation.

use anyhow::Result;

use envpreset::{ElectronTable, TargetsResolver};

use super::{browser_query, load_data, load_session, merge_targets, package_root, GlobalOpts};
use crate::cli::TargetArgs;

pub fn execute(args: TargetArgs, global: &GlobalOpts) -> Result<()> {
    let (session, config) = load_session(global, Some(&args))?;
    let data = load_data(global, &config)?;
    let electron = ElectronTable::bundled()?;

    let declared = merge_targets(config.preset.targets, &args)?;
    let use_built_ins = args.use_built_ins || config.preset.use_built_ins.unwrap_or(false);

    let resolved = TargetsResolver::new(&data, &electron, &session)
        .with_query(browser_query())
        .with_root(package_root(&args, &session))
        .with_built_ins(use_built_ins)
        .resolve(&declared)?;

    println!("{}", serde_json::to_string_pretty(&resolved.to_json())?);
    Ok(())
}
