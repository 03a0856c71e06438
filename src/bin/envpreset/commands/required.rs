//! `envpreset required` command implementation.

use anyhow::{bail, Result};

use envpreset::ops::{is_required, missing_targets};
use envpreset::{ElectronTable, TargetsResolver};

use super::{browser_query, load_data, load_session, merge_targets, package_root, GlobalOpts};
use crate::cli::RequiredArgs;

pub fn execute(args: RequiredArgs, global: &GlobalOpts) -> Result<()> {
    let (session, config) = load_session(global, Some(&args.targets))?;
    let data = load_data(global, &config)?;
    let electron = ElectronTable::bundled()?;

    let record = match data.plugins.get(&args.feature) {
        Some(record) => record,
        None => match data.built_ins.get(&args.feature) {
            Some(record) => record,
            None => bail!("unknown feature `{}`", args.feature),
        },
    };

    let use_built_ins = args.targets.use_built_ins || config.preset.use_built_ins.unwrap_or(false);
    let declared = merge_targets(config.preset.targets, &args.targets)?;
    let targets = TargetsResolver::new(&data, &electron, &session)
        .with_query(browser_query())
        .with_root(package_root(&args.targets, &session))
        .with_built_ins(use_built_ins)
        .resolve(&declared)?;

    if is_required(&targets, Some(record))? {
        println!(
            "{} is required by {}",
            args.feature,
            missing_targets(&targets, Some(record)).to_json()
        );
    } else {
        println!("{} is not required", args.feature);
    }

    Ok(())
}
