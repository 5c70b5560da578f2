//! Configuration file handling for scriptr

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::commands::words::SplitError;

/// Errors that can occur while registering lookup paths or loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid lookup path {path:?}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },
    #[error("Unable to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to parse YAML config file {path}: {source}")]
    Yaml {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("Unable to parse JSON config file {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("Invalid command `{line}` in script '{script}' ({path}): {source}")]
    InvalidCommand {
        script: String,
        line: String,
        path: PathBuf,
        #[source]
        source: SplitError,
    },
}

/// A script body: one command line, or several run in order
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ScriptDefinition {
    Single(String),
    Sequence(Vec<String>),
}

impl ScriptDefinition {
    /// Command lines in execution order
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        match self {
            ScriptDefinition::Single(line) => vec![line.as_str()],
            ScriptDefinition::Sequence(lines) => lines.iter().map(String::as_str).collect(),
        }
    }
}

/// Root configuration structure of a scriptr file
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scripts: BTreeMap<String, ScriptDefinition>,
}

/// Supported configuration file names, in lookup order
pub const FILENAMES: [&str; 3] = ["scriptr.yml", "scriptr.yaml", "scriptr.json"];

impl Config {
    /// Loads and parses a configuration file.
    ///
    /// An empty (or whitespace only) file is treated as a config without scripts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read, or
    /// `ConfigError::Yaml`/`ConfigError::Json` if parsing fails.
    pub fn from_file(file: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(file).map_err(|e| ConfigError::Read {
            path: file.to_path_buf(),
            source: e,
        })?;
        if contents.trim().is_empty() {
            debug!("Config file {} is empty", file.display());
            return Ok(Config::default());
        }
        let config: Config = if file.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
                source: e,
                path: file.to_path_buf(),
            })?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Yaml {
                source: e,
                path: file.to_path_buf(),
            })?
        };
        Ok(config)
    }

    /// Returns the config file inside `dir`, if one of [`FILENAMES`] exists there.
    ///
    /// A missing directory simply has no config file.
    #[must_use]
    pub fn find_in(dir: &Path) -> Option<PathBuf> {
        FILENAMES
            .iter()
            .map(|file| dir.join(file))
            .find(|path| path.is_file())
    }
}
