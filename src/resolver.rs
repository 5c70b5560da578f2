//! Finding script definitions across all lookup paths

use std::collections::{BTreeSet, HashSet};
use std::error::Error as StdError;
use std::path::PathBuf;

use log::{debug, info};
use thiserror::Error;

use crate::commands::command::Command;
use crate::config_file::{Config, ConfigError, ScriptDefinition};
use crate::lookup::LookupPaths;

/// Non-fatal conditions found while resolving a script
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    #[error("script '{script}' is defined in more than one config file: {}", display_paths(.sources))]
    MultipleDefinedScript {
        script: String,
        /// Every file defining the script, in precedence order
        sources: Vec<PathBuf>,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns true if `err`, or any error in its source chain, is a
/// [`ResolveWarning::MultipleDefinedScript`].
#[must_use]
pub fn is_multiple_defined_script(err: &(dyn StdError + 'static)) -> bool {
    std::iter::successors(Some(err), |&e| e.source())
        .any(|e| e.downcast_ref::<ResolveWarning>().is_some())
}

/// Outcome of resolving a script: the commands to run, plus at most one warning
#[derive(Debug, Default)]
pub struct Resolution {
    commands: Vec<Command>,
    warning: Option<ResolveWarning>,
}

impl Resolution {
    /// Commands in execution order, empty if the script was not found
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[must_use]
    pub fn warning(&self) -> Option<&ResolveWarning> {
        self.warning.as_ref()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Command>, Option<ResolveWarning>) {
        (self.commands, self.warning)
    }
}

/// Reads config files from every lookup path on each call
#[derive(Debug, Clone)]
pub struct ScriptResolver {
    lookup: LookupPaths,
}

impl ScriptResolver {
    #[must_use]
    pub fn new(lookup: LookupPaths) -> Self {
        Self { lookup }
    }

    /// Parse the config file of every lookup path that has one, in precedence order.
    ///
    /// Lookup paths leading to the same file (e.g. the working directory is
    /// `~/scriptr`) only contribute it once.
    fn load_configs(&self) -> Result<Vec<(PathBuf, Config)>, ConfigError> {
        let mut seen = HashSet::new();
        self.lookup
            .paths()
            .iter()
            .filter_map(|dir| Config::find_in(dir))
            .filter(|path| {
                let identity = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
                let first = seen.insert(identity);
                if !first {
                    debug!("Skipping {}, already read", path.display());
                }
                first
            })
            .map(|path| {
                debug!("Reading config file {}", path.display());
                Config::from_file(&path).map(|config| (path, config))
            })
            .collect()
    }

    /// Resolve `script` into the commands to run.
    ///
    /// When the script is defined in several files the first one in lookup order
    /// wins and the result carries a [`ResolveWarning::MultipleDefinedScript`].
    /// A script found nowhere yields an empty resolution.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any config file cannot be read or parsed, or if
    /// a command line of the selected definition is malformed.
    pub fn parse(&self, script: &str) -> Result<Resolution, ConfigError> {
        let mut occurrences: Vec<(PathBuf, ScriptDefinition)> = self
            .load_configs()?
            .into_iter()
            .filter_map(|(path, mut config)| {
                config.scripts.remove(script).map(|def| (path, def))
            })
            .collect();

        if occurrences.is_empty() {
            debug!("Script '{script}' not found in any config file");
            return Ok(Resolution::default());
        }

        let warning = (occurrences.len() > 1).then(|| ResolveWarning::MultipleDefinedScript {
            script: script.to_string(),
            sources: occurrences.iter().map(|(path, _)| path.clone()).collect(),
        });
        let (path, definition) = occurrences.swap_remove(0);
        info!("Using script '{script}' from {}", path.display());

        let commands = definition
            .lines()
            .into_iter()
            .map(|line| {
                Command::parse(line).map_err(|source| ConfigError::InvalidCommand {
                    script: script.to_string(),
                    line: line.to_string(),
                    path: path.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Resolution { commands, warning })
    }

    /// Names of all scripts defined in any config file, sorted and de-duplicated.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any config file cannot be read or parsed.
    pub fn parse_available_scripts(&self) -> Result<Vec<String>, ConfigError> {
        let names: BTreeSet<String> = self
            .load_configs()?
            .into_iter()
            .flat_map(|(_, config)| config.scripts.into_keys())
            .collect();
        Ok(names.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source(content: &str) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scriptr.yml"), content).unwrap();
        dir
    }

    fn resolver(dirs: &[&TempDir]) -> ScriptResolver {
        let mut lookup = LookupPaths::new();
        for dir in dirs {
            lookup.add_lookup_path(dir.path()).unwrap();
        }
        ScriptResolver::new(lookup)
    }

    #[test]
    fn test_single_source_has_no_warning() {
        let a = source("scripts:\n  lint: cargo clippy --all\n");
        let b = source("scripts:\n  other: echo other\n");
        let resolution = resolver(&[&a, &b]).parse("lint").unwrap();
        assert!(resolution.warning().is_none());
        assert_eq!(
            resolution.commands(),
            &[Command {
                program: "cargo".to_string(),
                args: vec!["clippy".to_string(), "--all".to_string()],
            }]
        );
    }

    #[test]
    fn test_first_registered_source_wins() {
        let a = source("scripts:\n  build: docker compose build\n");
        let b = source("scripts:\n  build: make build\n");
        let (commands, warning) = resolver(&[&a, &b]).parse("build").unwrap().into_parts();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].to_string(), "docker compose build");
        assert_eq!(
            warning,
            Some(ResolveWarning::MultipleDefinedScript {
                script: "build".to_string(),
                sources: vec![a.path().join("scriptr.yml"), b.path().join("scriptr.yml")],
            })
        );
    }

    #[test]
    fn test_same_file_reached_twice_is_one_source() {
        let a = source("scripts:\n  build: make build\n");
        let mut lookup = LookupPaths::new();
        lookup.add_lookup_path(a.path()).unwrap();
        lookup.add_lookup_path(a.path().join(".")).unwrap();
        let resolver = ScriptResolver::new(lookup);

        let resolution = resolver.parse("build").unwrap();
        assert!(resolution.warning().is_none());
        assert_eq!(resolution.commands().len(), 1);
        assert_eq!(resolver.parse_available_scripts().unwrap(), vec!["build"]);
    }

    #[test]
    fn test_precedence_follows_registration_not_content() {
        let a = source("scripts:\n  build: docker compose build\n");
        let b = source("scripts:\n  build: make build\n");
        let (commands, _) = resolver(&[&b, &a]).parse("build").unwrap().into_parts();
        assert_eq!(commands[0].to_string(), "make build");
    }

    #[test]
    fn test_missing_script_is_empty_without_error() {
        let a = source("scripts:\n  build: make\n");
        let resolution = resolver(&[&a]).parse("deploy").unwrap();
        assert!(resolution.commands().is_empty());
        assert!(resolution.warning().is_none());
    }

    #[test]
    fn test_missing_lookup_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut lookup = LookupPaths::new();
        lookup.add_lookup_path(dir.path().join("gone")).unwrap();
        let resolver = ScriptResolver::new(lookup);
        assert!(resolver.parse("build").unwrap().commands().is_empty());
        assert!(resolver.parse_available_scripts().unwrap().is_empty());
    }

    #[test]
    fn test_sequence_keeps_order() {
        let a = source("scripts:\n  setup:\n    - echo start\n    - echo end\n");
        let resolution = resolver(&[&a]).parse("setup").unwrap();
        let lines: Vec<String> = resolution.commands().iter().map(ToString::to_string).collect();
        assert_eq!(lines, vec!["echo start", "echo end"]);
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let a = source("scripts:\n  build: make\n");
        let b = source("scripts: [broken\n");
        assert!(matches!(
            resolver(&[&a, &b]).parse("build"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn test_malformed_command_line_is_fatal() {
        let a = source("scripts:\n  say: echo 'unterminated\n");
        match resolver(&[&a]).parse("say") {
            Err(ConfigError::InvalidCommand { script, line, .. }) => {
                assert_eq!(script, "say");
                assert_eq!(line, "echo 'unterminated");
            }
            other => panic!("Expected ConfigError::InvalidCommand, got: {other:?}"),
        }
    }

    #[test]
    fn test_available_scripts_are_sorted_and_unique() {
        let a = source("scripts:\n  test: cargo test\n  build: make\n");
        let b = source("scripts:\n  build: make build\n  deploy: ./deploy.sh\n");
        let scripts = resolver(&[&a, &b]).parse_available_scripts().unwrap();
        assert_eq!(scripts, vec!["build", "deploy", "test"]);
    }

    #[test]
    fn test_available_scripts_fail_on_malformed_file() {
        let a = source("scripts:\n  - nope\n");
        assert!(resolver(&[&a]).parse_available_scripts().is_err());
    }

    #[test]
    fn test_is_multiple_defined_script() {
        let warning = ResolveWarning::MultipleDefinedScript {
            script: "build".to_string(),
            sources: vec![],
        };
        assert!(is_multiple_defined_script(&warning));

        let fatal = ConfigError::InvalidPath {
            path: PathBuf::new(),
            reason: "path is empty".to_string(),
        };
        assert!(!is_multiple_defined_script(&fatal));
    }

    #[test]
    fn test_is_multiple_defined_script_follows_source_chain() {
        #[derive(Error, Debug)]
        #[error("run failed")]
        struct Wrapped(#[source] ResolveWarning);

        let wrapped = Wrapped(ResolveWarning::MultipleDefinedScript {
            script: "build".to_string(),
            sources: vec![],
        });
        assert!(is_multiple_defined_script(&wrapped));
    }
}
