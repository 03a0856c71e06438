//! Per-configuration session state.
//!
//! A `Session` carries the working directory, the node version used for
//! `node: "current"` targets and whether the debug report has already been
//! rendered. One session spans one configuration pass; constructing a fresh
//! one (or calling [`Session::reset`]) re-arms the debug report.

use std::cell::{Cell, OnceCell};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::util::process;

/// Directory name used for global and project configuration.
pub const CONFIG_DIR_NAME: &str = ".envpreset";

/// Session state shared by one configuration pass.
#[derive(Debug, Clone)]
pub struct Session {
    /// Current working directory (project root for `package.json`)
    cwd: PathBuf,

    /// Home directory for global configuration (~/.envpreset/)
    home: PathBuf,

    /// Node version override; probed from `node --version` when unset
    node_version: OnceCell<String>,

    /// Whether the debug report was already rendered
    logged: Cell<bool>,
}

impl Session {
    /// Create a new Session rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a Session with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let home = BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(CONFIG_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR_NAME));

        Session {
            cwd,
            home,
            node_version: OnceCell::new(),
            logged: Cell::new(false),
        }
    }

    /// Pin the running node version instead of probing for it.
    pub fn with_node_version(self, version: impl Into<String>) -> Self {
        let node_version = OnceCell::new();
        let _ = node_version.set(version.into());
        Session {
            node_version,
            ..self
        }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the envpreset home directory (~/.envpreset/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project-local configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.cwd.join(CONFIG_DIR_NAME).join("config.toml")
    }

    /// Version string of the running node (`v6.5.0`), probed at most once.
    pub fn current_node_version(&self) -> Result<&str> {
        if let Some(version) = self.node_version.get() {
            return Ok(version);
        }
        let probed = process::node_version(&self.cwd)?;
        Ok(self.node_version.get_or_init(|| probed))
    }

    /// Whether the debug report was already rendered in this session.
    pub fn has_logged(&self) -> bool {
        self.logged.get()
    }

    /// Record that the debug report has been rendered.
    pub fn mark_logged(&self) {
        self.logged.set(true);
    }

    /// Re-arm the debug report.
    pub fn reset(&self) {
        self.logged.set(false);
    }
}
