//! `envpreset build-data` command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};

use envpreset::matrix::BuildInputs;
use envpreset::ops::build_data::{build_data, stale_diagnostic};
use envpreset::ops::{BuildDataOptions, BuildDataOutcome};
use envpreset::util::diagnostic;

use super::{load_session, GlobalOpts};
use crate::cli::BuildDataArgs;

const DEFAULT_OUT_DIR: &str = "data";

pub fn execute(args: BuildDataArgs, global: &GlobalOpts) -> Result<()> {
    let (_session, config) = load_session(global, None)?;

    let corpus = args
        .corpus
        .or(config.data.corpus)
        .context("no corpus directory; pass --corpus or set `corpus` under [data] in the config")?;
    let out = args
        .out
        .or_else(|| global.data_dir.clone())
        .or(config.data.dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

    let inputs = BuildInputs::bundled()?;
    let options = BuildDataOptions {
        corpus,
        out,
        check: args.check,
    };

    match build_data(&options, &inputs)? {
        BuildDataOutcome::Written { plugins, built_ins } => {
            println!(
                "Generated {} plugin and {} built-in records in {}",
                plugins,
                built_ins,
                options.out.display()
            );
        }
        BuildDataOutcome::UpToDate => {
            println!("Data in {} is up to date", options.out.display());
        }
        BuildDataOutcome::Stale(stale) => {
            diagnostic::emit(&stale_diagnostic(&stale), global.color());
            std::process::exit(1);
        }
    }

    Ok(())
}
