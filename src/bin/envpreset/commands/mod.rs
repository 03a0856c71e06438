//! Command implementations.

pub mod build_data;
pub mod completions;
pub mod preset;
pub mod required;
pub mod targets;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use envpreset::core::targets::TargetValue;
use envpreset::resolver::engines::PACKAGE_JSON;
use envpreset::resolver::BrowserQuery;
use envpreset::util::config::load_config;
use envpreset::util::fs;
use envpreset::util::{Config, Session};
use envpreset::{CompatData, TargetSpec};

use crate::cli::TargetArgs;

/// Flags shared by every command.
pub struct GlobalOpts {
    pub no_color: bool,
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl GlobalOpts {
    /// Whether diagnostics on stderr may use color.
    pub fn color(&self) -> bool {
        use std::io::IsTerminal;
        !self.no_color && std::io::stderr().is_terminal()
    }
}

/// Session and merged config for a command.
pub fn load_session(global: &GlobalOpts, targets: Option<&TargetArgs>) -> Result<(Session, Config)> {
    let mut session = Session::new()?;
    if let Some(version) = targets.and_then(|t| t.node_version.as_deref()) {
        session = session.with_node_version(version);
    }

    // --config stands in for the project file; the global file still applies
    let config = match &global.config {
        Some(path) => {
            let mut config = Config::load_or_default(&session.config_path());
            config.merge(Config::load(path)?);
            config
        }
        None => load_config(&session.config_path(), &session.project_config_path()),
    };

    Ok((session, config))
}

/// Compatibility data from `--data-dir`, the config, or the bundled copy.
pub fn load_data(global: &GlobalOpts, config: &Config) -> Result<CompatData> {
    match global.data_dir.as_ref().or(config.data.dir.as_ref()) {
        Some(dir) => {
            tracing::debug!("loading compatibility data from {}", dir.display());
            CompatData::load(dir)
        }
        None => CompatData::bundled(),
    }
}

/// Browser query collaborator for `browsers` targets.
pub fn browser_query() -> &'static dyn BrowserQuery {
    #[cfg(feature = "browserslist")]
    {
        &envpreset::resolver::BrowserslistQuery
    }
    #[cfg(not(feature = "browserslist"))]
    {
        &envpreset::resolver::LiteralBrowserQuery
    }
}

/// Targets from the config with command-line targets layered on top.
pub fn merge_targets(configured: Option<TargetSpec>, args: &TargetArgs) -> Result<TargetSpec> {
    let mut targets = configured.unwrap_or_default();

    for entry in &args.targets {
        let (env, value) = parse_target(entry)?;
        targets.insert(env, value);
    }

    if !args.browsers.is_empty() {
        targets.insert("browsers", TargetValue::List(args.browsers.clone()));
    }

    Ok(targets)
}

/// Parse one `ENV=VERSION` argument.
fn parse_target(entry: &str) -> Result<(String, TargetValue)> {
    let Some((env, value)) = entry.split_once('=') else {
        bail!("invalid target `{}`: expected ENV=VERSION", entry);
    };

    let env = env.trim();
    if env.is_empty() {
        bail!("invalid target `{}`: missing environment name", entry);
    }

    let value = value.trim();
    let value = match value {
        "true" => TargetValue::Bool(true),
        "false" => TargetValue::Bool(false),
        _ => match value.parse::<f64>() {
            Ok(n) if n.is_finite() => TargetValue::Number(n),
            _ => TargetValue::Text(value.to_string()),
        },
    };

    Ok((env.to_string(), value))
}

/// Package root for `node: "engines"`: `--root`, else the nearest
/// directory holding `package.json`, else the working directory.
pub fn package_root(args: &TargetArgs, session: &Session) -> PathBuf {
    if let Some(root) = &args.root {
        return fs::normalize_path(root);
    }

    fs::find_upwards(session.cwd(), PACKAGE_JSON)
        .and_then(|manifest| manifest.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| session.cwd().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        assert_eq!(
            parse_target("chrome=52").unwrap(),
            ("chrome".to_string(), TargetValue::Number(52.0))
        );
        assert_eq!(
            parse_target("node=current").unwrap(),
            ("node".to_string(), TargetValue::Text("current".into()))
        );
        assert_eq!(
            parse_target("node=true").unwrap(),
            ("node".to_string(), TargetValue::Bool(true))
        );
        assert_eq!(
            parse_target("chrome=NaN").unwrap(),
            ("chrome".to_string(), TargetValue::Text("NaN".into()))
        );
        assert_eq!(
            parse_target("chrome=inf").unwrap(),
            ("chrome".to_string(), TargetValue::Text("inf".into()))
        );
        assert!(parse_target("chrome").is_err());
        assert!(parse_target("=52").is_err());
    }

    #[test]
    fn test_cli_targets_override_config() {
        let configured = TargetSpec::new().with("chrome", 49.0).with("ie", 11.0);
        let args = TargetArgs {
            targets: vec!["chrome=55".into()],
            browsers: vec!["firefox 50".into()],
            ..TargetArgs::default()
        };

        let targets = merge_targets(Some(configured), &args).unwrap();
        assert_eq!(targets.get("chrome"), Some(&TargetValue::Number(55.0)));
        assert_eq!(targets.get("ie"), Some(&TargetValue::Number(11.0)));
        assert_eq!(
            targets.get("browsers"),
            Some(&TargetValue::List(vec!["firefox 50".into()]))
        );
    }
}
