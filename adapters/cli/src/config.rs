//! `descent.toml` loading with defaults for every key.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result as AnyResult};
use descent_system_solver::SolverConfig;
use serde::Deserialize;

/// Effective settings of one CLI invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Config {
    /// Directory holding one sub-directory per level.
    pub(crate) levels_dir: PathBuf,
    /// Directory receiving solution transcripts.
    pub(crate) solutions_dir: PathBuf,
    /// Expanded-state interval between progress events.
    pub(crate) progress_interval: u64,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub(crate) log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

impl Config {
    /// Reads the file at `path`; a missing file yields the defaults.
    pub(crate) fn load(path: &Path) -> AnyResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text)
                .with_context(|| format!("failed to parse config {}", path.display())),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => {
                Err(error).with_context(|| format!("failed to read config {}", path.display()))
            }
        }
    }

    pub(crate) fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Self::from)
    }

    /// Applies command-line overrides on top of the file values.
    #[must_use]
    pub(crate) fn with_overrides(
        mut self,
        levels_dir: Option<PathBuf>,
        solutions_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(levels_dir) = levels_dir {
            self.levels_dir = levels_dir;
        }
        if let Some(solutions_dir) = solutions_dir {
            self.solutions_dir = solutions_dir;
        }
        self
    }

    pub(crate) fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            progress_interval: self.progress_interval,
        }
    }
}

// TOML schema

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    paths: TomlPaths,
    #[serde(default)]
    search: TomlSearch,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlPaths {
    #[serde(default = "default_levels_dir")]
    levels_dir: PathBuf,
    #[serde(default = "default_solutions_dir")]
    solutions_dir: PathBuf,
}

#[derive(Deserialize, Debug)]
struct TomlSearch {
    #[serde(default = "default_progress_interval")]
    progress_interval: u64,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_filter")]
    filter: String,
}

impl Default for TomlPaths {
    fn default() -> Self {
        Self {
            levels_dir: default_levels_dir(),
            solutions_dir: default_solutions_dir(),
        }
    }
}

impl Default for TomlSearch {
    fn default() -> Self {
        Self {
            progress_interval: default_progress_interval(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl From<TomlConfig> for Config {
    fn from(toml: TomlConfig) -> Self {
        Self {
            levels_dir: toml.paths.levels_dir,
            solutions_dir: toml.paths.solutions_dir,
            progress_interval: toml.search.progress_interval,
            log_filter: toml.log.filter,
        }
    }
}

fn default_levels_dir() -> PathBuf {
    PathBuf::from("levels")
}

fn default_solutions_dir() -> PathBuf {
    PathBuf::from("solutions")
}

fn default_progress_interval() -> u64 {
    SolverConfig::default().progress_interval
}

fn default_log_filter() -> String {
    "info".to_owned()
}
