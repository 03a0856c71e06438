//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// envpreset - pick the syntax transforms and polyfills your targets still need
#[derive(Parser)]
#[command(name = "envpreset")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to use instead of .envpreset/config.toml
    #[arg(long, global = true, env = "ENVPRESET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory with plugins.json and built-ins.json to use instead of the bundled data
    #[arg(long, global = true, env = "ENVPRESET_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the compat-table corpus into plugins.json and built-ins.json
    BuildData(BuildDataArgs),

    /// Print resolved targets as JSON
    Targets(TargetArgs),

    /// Show the transforms and polyfills selected for the targets
    Preset(PresetArgs),

    /// Check whether one feature is still required for the targets
    Required(RequiredArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildDataArgs {
    /// Raw corpus directory (environments.json, data-es6.json, data-es2016plus.json)
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Output directory for the generated files
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Compare against the existing files instead of writing
    #[arg(long)]
    pub check: bool,
}

#[derive(Args, Clone, Default)]
pub struct TargetArgs {
    /// Target as ENV=VERSION (e.g. chrome=52, node=current, electron=1.4)
    #[arg(short, long = "target", value_name = "ENV=VERSION")]
    pub targets: Vec<String>,

    /// Browser query entry (e.g. "chrome 49, ie 11")
    #[arg(long = "browsers", value_name = "QUERY")]
    pub browsers: Vec<String>,

    /// Running node version to assume for node=current
    #[arg(long, env = "ENVPRESET_NODE_VERSION")]
    pub node_version: Option<String>,

    /// Directory containing package.json for node=engines
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Consider built-in node versions for node=engines
    #[arg(long)]
    pub use_built_ins: bool,
}

#[derive(Args)]
pub struct PresetArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Module format: amd, commonjs, systemjs, umd or false
    #[arg(long)]
    pub modules: Option<String>,

    /// Always select a transform or polyfill
    #[arg(long)]
    pub include: Vec<String>,

    /// Never select a transform or polyfill
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Pass loose mode to every transform
    #[arg(long)]
    pub loose: bool,

    /// Print the debug report
    #[arg(long)]
    pub debug: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct RequiredArgs {
    /// Feature name (e.g. transform-es2015-classes or es6.promise)
    pub feature: String,

    #[command(flatten)]
    pub targets: TargetArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
