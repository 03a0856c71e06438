//! Target resolution.
//!
//! Turns a declared [`TargetSpec`] into concrete numeric versions:
//!
//! - `node: true | "current"` becomes the running node's `major.minor`
//! - `node: "engines"` becomes the lowest known node allowed by `package.json`
//! - `electron` folds into `chrome` through the Electron table
//! - `browsers` expands through a [`BrowserQuery`]

pub mod browsers;
pub mod engines;
pub mod errors;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::core::compat::CompatData;
use crate::core::electron::ElectronTable;
use crate::core::targets::{TargetSpec, TargetValue};
use crate::core::version::desemverify;
use crate::util::context::Session;

pub use browsers::{BrowserQuery, BrowserQueryError, LiteralBrowserQuery};
#[cfg(feature = "browserslist")]
pub use browsers::BrowserslistQuery;
pub use errors::TargetError;

static LITERAL_QUERY: LiteralBrowserQuery = LiteralBrowserQuery;

static ELECTRON_RELEASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.\d+)").unwrap());

/// Resolves declared targets against the loaded data and the session.
pub struct TargetsResolver<'a> {
    data: &'a CompatData,
    electron: &'a ElectronTable,
    session: &'a Session,
    query: &'a dyn BrowserQuery,
    use_built_ins: bool,
    root: Option<PathBuf>,
}

impl<'a> TargetsResolver<'a> {
    pub fn new(data: &'a CompatData, electron: &'a ElectronTable, session: &'a Session) -> Self {
        TargetsResolver {
            data,
            electron,
            session,
            query: &LITERAL_QUERY,
            use_built_ins: false,
            root: None,
        }
    }

    /// Use a different browser query collaborator.
    pub fn with_query(mut self, query: &'a dyn BrowserQuery) -> Self {
        self.query = query;
        self
    }

    /// Consider built-in node versions for `node: "engines"`.
    pub fn with_built_ins(mut self, use_built_ins: bool) -> Self {
        self.use_built_ins = use_built_ins;
        self
    }

    /// Directory holding `package.json`; defaults to the session directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    fn root(&self) -> &Path {
        self.root.as_deref().unwrap_or_else(|| self.session.cwd())
    }

    /// Resolve every special target value. The input is left untouched.
    pub fn resolve(&self, targets: &TargetSpec) -> Result<TargetSpec, TargetError> {
        let mut resolved = targets.clone();

        match resolved.get("node") {
            Some(TargetValue::Bool(true)) => {
                resolved.insert("node", self.current_node()?);
            }
            Some(TargetValue::Text(t)) if t == "current" => {
                resolved.insert("node", self.current_node()?);
            }
            Some(TargetValue::Text(t)) if t == "engines" => {
                let known = self.data.node_versions(self.use_built_ins);
                resolved.insert("node", engines::engines_node_version(self.root(), &known)?);
            }
            _ => {}
        }

        if let Some(electron) = resolved.remove("electron") {
            let chromium = electron_to_chrome(self.electron, &electron)?;
            let chrome = match resolved.get("chrome") {
                Some(TargetValue::Number(chrome)) => Some(chrome.min(chromium)),
                Some(_) => None,
                None => Some(chromium),
            };
            match chrome {
                Some(chrome) => resolved.insert("chrome", chrome),
                None => tracing::debug!("keeping non-numeric chrome target over electron"),
            }
        }

        self.expand_browsers(resolved)
    }

    fn expand_browsers(&self, targets: TargetSpec) -> Result<TargetSpec, TargetError> {
        let queries = match targets.get("browsers") {
            None => return Ok(targets),
            Some(TargetValue::Text(query)) => vec![query.clone()],
            Some(TargetValue::List(queries)) => queries.clone(),
            Some(other) => {
                return Err(TargetError::InvalidBrowsersQuery {
                    value: other.to_string(),
                })
            }
        };

        let entries = self.query.resolve(&queries)?;
        let lowest = browsers::lowest_versions(&entries);
        tracing::debug!(entries = entries.len(), families = lowest.len(), "expanded browser query");

        Ok(browsers::merge_browsers(lowest, &targets))
    }

    fn current_node(&self) -> Result<f64, TargetError> {
        let version = self
            .session
            .current_node_version()
            .map_err(|e| TargetError::CurrentNode {
                message: format!("{:#}", e),
            })?;
        desemverify(version).ok_or_else(|| TargetError::InvalidNodeVersion {
            version: version.to_string(),
        })
    }
}

/// Chrome version bundled with an Electron target value.
///
/// The release key is the leading `major.minor` of the value; a bare `"1"`
/// means `"1.0"`.
pub fn electron_to_chrome(table: &ElectronTable, value: &TargetValue) -> Result<f64, TargetError> {
    let mut text = match value {
        TargetValue::Number(_) | TargetValue::Text(_) => value.to_string(),
        other => {
            return Err(TargetError::ElectronNotSemver {
                value: other.to_string(),
            })
        }
    };
    if text == "1" {
        text.push_str(".0");
    }

    let Some(key) = ELECTRON_RELEASE.captures(&text).and_then(|caps| caps.get(1)) else {
        return Err(TargetError::ElectronNotSemver { value: text });
    };

    table
        .chromium_for(key.as_str())
        .ok_or_else(|| TargetError::UnknownElectron {
            version: key.as_str().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compat::{CompatMatrix, CompatRecord};
    use crate::core::version::VersionToken;
    use tempfile::TempDir;

    fn table() -> ElectronTable {
        ElectronTable::from_pairs([("1.0", "49"), ("1.4", "53"), ("1.6", "56")]).unwrap()
    }

    fn data() -> CompatData {
        let mut plugins = CompatMatrix::new();
        plugins.insert(
            "transform-es2015-classes",
            [("node", VersionToken::Number(5.0))].into_iter().collect::<CompatRecord>(),
        );
        plugins.insert(
            "transform-es2015-destructuring",
            [("node", VersionToken::Number(6.5))].into_iter().collect::<CompatRecord>(),
        );
        let mut built_ins = CompatMatrix::new();
        built_ins.insert(
            "es6.object.is",
            [("node", VersionToken::Number(0.12))].into_iter().collect::<CompatRecord>(),
        );
        CompatData { plugins, built_ins }
    }

    #[test]
    fn test_electron_key_normalization() {
        let table = table();
        assert_eq!(electron_to_chrome(&table, &TargetValue::Number(1.0)).unwrap(), 49.0);
        assert_eq!(electron_to_chrome(&table, &"1".into()).unwrap(), 49.0);
        assert_eq!(electron_to_chrome(&table, &"1.4.3".into()).unwrap(), 53.0);
    }

    #[test]
    fn test_electron_errors() {
        let table = table();
        assert!(matches!(
            electron_to_chrome(&table, &"latest".into()),
            Err(TargetError::ElectronNotSemver { .. })
        ));
        assert!(matches!(
            electron_to_chrome(&table, &TargetValue::Number(9.9)),
            Err(TargetError::UnknownElectron { .. })
        ));
    }

    #[test]
    fn test_electron_folds_into_chrome() {
        let data = data();
        let table = table();
        let session = Session::with_cwd(PathBuf::from("."));
        let resolver = TargetsResolver::new(&data, &table, &session);

        let only_electron = resolver.resolve(&TargetSpec::new().with("electron", 1.4)).unwrap();
        assert_eq!(only_electron.get("chrome"), Some(&TargetValue::Number(53.0)));
        assert!(!only_electron.contains("electron"));

        let lower_chrome = resolver
            .resolve(&TargetSpec::new().with("electron", 1.4).with("chrome", 50.0))
            .unwrap();
        assert_eq!(lower_chrome.get("chrome"), Some(&TargetValue::Number(50.0)));

        let higher_chrome = resolver
            .resolve(&TargetSpec::new().with("electron", "1.0").with("chrome", 55.0))
            .unwrap();
        assert_eq!(higher_chrome.get("chrome"), Some(&TargetValue::Number(49.0)));
    }

    #[test]
    fn test_current_node_from_session() {
        let data = data();
        let table = table();
        let session = Session::with_cwd(PathBuf::from(".")).with_node_version("v6.9.1-pre+build");
        let resolver = TargetsResolver::new(&data, &table, &session);

        let resolved = resolver.resolve(&TargetSpec::new().with("node", "current")).unwrap();
        assert_eq!(resolved.get("node"), Some(&TargetValue::Number(6.9)));

        let from_bool = resolver
            .resolve(&TargetSpec::new().with("node", TargetValue::Bool(true)))
            .unwrap();
        assert_eq!(from_bool.get("node"), Some(&TargetValue::Number(6.9)));
    }

    #[test]
    fn test_engines_respects_built_ins() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("package.json"),
            r#"{ "engines": { "node": ">=0.10" } }"#,
        )
        .unwrap();

        let data = data();
        let table = table();
        let session = Session::with_cwd(tmp.path().to_path_buf());
        let targets = TargetSpec::new().with("node", "engines");

        let plugins_only = TargetsResolver::new(&data, &table, &session).resolve(&targets).unwrap();
        assert_eq!(plugins_only.get("node"), Some(&TargetValue::Number(5.0)));

        let with_built_ins = TargetsResolver::new(&data, &table, &session)
            .with_built_ins(true)
            .resolve(&targets)
            .unwrap();
        assert_eq!(with_built_ins.get("node"), Some(&TargetValue::Number(0.12)));
    }

    #[test]
    fn test_browsers_expanded_and_overridden() {
        let data = data();
        let table = table();
        let session = Session::with_cwd(PathBuf::from("."));
        let resolver = TargetsResolver::new(&data, &table, &session);

        let targets = TargetSpec::new()
            .with("browsers", TargetValue::List(vec!["chrome 52".into(), "ie 10, ie 11".into()]))
            .with("chrome", 55.0);
        let resolved = resolver.resolve(&targets).unwrap();

        assert_eq!(resolved.get("chrome"), Some(&TargetValue::Number(55.0)));
        assert_eq!(resolved.get("ie"), Some(&TargetValue::Number(10.0)));
        assert!(!resolved.contains("browsers"));
    }

    #[test]
    fn test_browser_query_errors_propagate() {
        struct Failing;
        impl BrowserQuery for Failing {
            fn resolve(&self, queries: &[String]) -> Result<Vec<String>, BrowserQueryError> {
                Err(BrowserQueryError::new(queries.join(","), "query service unavailable"))
            }
        }

        let data = data();
        let table = table();
        let session = Session::with_cwd(PathBuf::from("."));
        let resolver = TargetsResolver::new(&data, &table, &session).with_query(&Failing);

        let err = resolver
            .resolve(&TargetSpec::new().with("browsers", "> 1%"))
            .unwrap_err();
        assert_eq!(err.to_string(), "query service unavailable");

        let err = resolver
            .resolve(&TargetSpec::new().with("browsers", 5.0))
            .unwrap_err();
        assert!(matches!(err, TargetError::InvalidBrowsersQuery { .. }));
    }

    #[test]
    fn test_plain_targets_untouched() {
        let data = data();
        let table = table();
        let session = Session::with_cwd(PathBuf::from("."));
        let targets = TargetSpec::new().with("chrome", 49.0).with("ie", 11.0);

        let resolved = TargetsResolver::new(&data, &table, &session).resolve(&targets).unwrap();
        assert_eq!(resolved, targets);
    }
}
