//! Resolve a script and run its commands in order

use std::io::Write;

use log::debug;
use thiserror::Error;

use crate::config_file::ConfigError;
use crate::output::Console;
use crate::process::{ExecError, Launcher};
use crate::resolver::{ResolveWarning, ScriptResolver};

/// Warning shown when a script is defined in more than one config file
pub const MULTIPLE_DEFINITIONS_WARNING: &str =
    "Attention: the script was found in more than one configuration file";

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("script '{0}' was not found in any configuration file")]
    ScriptNotFound(String),
    #[error("you cannot pass in extra arguments to multiple commands scripts")]
    ExtraArgumentsNotAllowed,
    #[error(transparent)]
    Exec(#[from] ExecError),
}

impl RunError {
    /// Process exit status for this error.
    ///
    /// A failing child's own exit code is passed through, everything else is `1`.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Exec(ExecError::ExitCode { code, .. }) => {
                u8::try_from(*code).ok().filter(|&c| c != 0).unwrap_or(1)
            }
            _ => 1,
        }
    }
}

/// Drives one script invocation from resolution to execution
pub struct RunOrchestrator<L, W> {
    resolver: ScriptResolver,
    launcher: L,
    console: Console<W>,
}

impl<L: Launcher, W: Write> RunOrchestrator<L, W> {
    pub fn new(resolver: ScriptResolver, launcher: L, console: Console<W>) -> Self {
        Self {
            resolver,
            launcher,
            console,
        }
    }

    /// Run `script`, forwarding `args` to it.
    ///
    /// Extra arguments are only accepted for single-command scripts. Commands run
    /// one after another and the first failure stops the rest.
    ///
    /// # Errors
    ///
    /// Returns `RunError::Config` if resolution fails, `RunError::ScriptNotFound`
    /// if no config file defines the script, `RunError::ExtraArgumentsNotAllowed`
    /// if arguments were given for a multi-command script, or `RunError::Exec`
    /// for the first command that fails.
    pub async fn execute(&mut self, script: &str, args: &[String]) -> Result<(), RunError> {
        let (commands, warning) = self.resolver.parse(script)?.into_parts();

        if let Some(ResolveWarning::MultipleDefinedScript { sources, .. }) = &warning {
            self.console.warning(MULTIPLE_DEFINITIONS_WARNING);
            debug!("'{script}' is defined in: {sources:?}");
        }

        if commands.is_empty() {
            return Err(RunError::ScriptNotFound(script.to_string()));
        }

        if !args.is_empty() && commands.len() > 1 {
            return Err(RunError::ExtraArgumentsNotAllowed);
        }

        for mut command in commands {
            if !args.is_empty() {
                command.append_args(args.iter().cloned());
            }
            command.interactive(&self.launcher).await?;
        }
        Ok(())
    }

    pub fn into_console(self) -> Console<W> {
        self.console
    }
}
