//! envpreset CLI entry point.

mod cli;
mod commands;

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use envpreset::ops::OptionsError;
use envpreset::resolver::TargetError;
use envpreset::util::diagnostic;

use cli::{Cli, Commands};
use commands::GlobalOpts;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("envpreset=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("envpreset=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global = GlobalOpts {
        no_color: cli.no_color,
        config: cli.config,
        data_dir: cli.data_dir,
    };

    match cli.command {
        Commands::BuildData(args) => commands::build_data::execute(args, &global),
        Commands::Targets(args) => commands::targets::execute(args, &global),
        Commands::Preset(args) => commands::preset::execute(args, &global),
        Commands::Required(args) => commands::required::execute(args, &global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error, as a diagnostic when it carries one.
fn report(err: &anyhow::Error, color: bool) {
    let diag = err
        .chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<TargetError>()
                .map(TargetError::to_diagnostic)
                .or_else(|| cause.downcast_ref::<OptionsError>().map(OptionsError::to_diagnostic))
        });

    match diag {
        Some(diag) => diagnostic::emit(&diag, color),
        None => eprintln!("error: {:#}", err),
    }
}
