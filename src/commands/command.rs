use log::debug;

use crate::commands::words::{self, SplitError};
use crate::process::{self, ExecError, Launcher, RunningProcess};

/// A single resolved invocation: a program plus its arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub program: String,
    pub args: Vec<String>,
}

impl Command {
    /// Build a command from one configured command line.
    ///
    /// # Errors
    ///
    /// Returns `SplitError` if the line is blank or its quoting is malformed.
    pub fn parse(line: &str) -> Result<Self, SplitError> {
        let mut words = words::split(line)?.into_iter();
        let program = words.next().ok_or(SplitError::Empty)?;
        Ok(Command {
            program,
            args: words.collect(),
        })
    }

    /// Append extra trailing arguments after the configured ones
    pub fn append_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
    }

    /// Run the command attached to the current terminal and wait for it.
    ///
    /// Signals received while waiting are forwarded to the child.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Launch` if the program cannot be started,
    /// `ExecError::ExitCode` if it exits unsuccessfully, or `ExecError::Wait`
    /// if waiting on it fails.
    pub async fn interactive<L: Launcher>(&self, launcher: &L) -> Result<(), ExecError> {
        debug!("Running {self}");
        let mut child = launcher.launch(self)?;
        let target = child.signal_target();
        let code = process::wait_forwarding_signals(&mut child, &target)
            .await
            .map_err(|source| ExecError::Wait {
                program: self.program.clone(),
                source,
            })?;
        debug!("`{}` exited with status {code}", self.program);
        if code == 0 {
            Ok(())
        } else {
            Err(ExecError::ExitCode {
                program: self.program.clone(),
                code,
            })
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
