use miette::{IntoDiagnostic, Result, WrapErr, miette};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at a config file.
pub const CONFIG_ENV: &str = "ENTIMARK_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Syntax used when none is given on the command line.
    pub syntax: Option<String>,
    /// Render crossing entities instead of failing.
    pub allow_crossing_spans: bool,
}

impl Config {
    pub fn load(store: &FileStore) -> Result<Self> {
        store
            .load()
            .wrap_err_with(|| format!("failed to load config from {}", store.path.display()))
    }

    /// Resolves the config file to use: an explicit path, then
    /// `$ENTIMARK_CONFIG`, then `<config dir>/entimark/config.toml` when it
    /// exists. Without any of them the defaults apply.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| default_config_path().filter(|p| p.exists()));

        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&FileStore::new(path))
            }
            None => Ok(Self::default()),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("entimark").join("config.toml"))
}

/// Reads a [`Config`] from a file, picking the format from its extension.
/// Only `.toml` and `.json` are supported.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<Config> {
        let contents = std::fs::read_to_string(&self.path).into_diagnostic()?;
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents).into_diagnostic(),
            Some("toml") => toml::from_str(&contents).into_diagnostic(),
            _ => Err(miette!(
                "unsupported config format: {} (expected .toml or .json)",
                self.path.display()
            )),
        }
    }
}
