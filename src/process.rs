//! Launching interactive child processes.
//!
//! The orchestrator only talks to the [`Launcher`], [`RunningProcess`] and
//! [`SignalTarget`] traits, so sequencing can be exercised with processes that
//! never touch the OS. [`SystemLauncher`] is the real implementation on top of
//! `tokio::process`, with signal forwarding through `nix` on Unix.

use std::future::Future;
use std::io;
use std::process::{ExitStatus, Stdio};

use log::{debug, warn};
use thiserror::Error;

use crate::commands::command::Command;

/// Errors that can occur while running a command
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with status {code}")]
    ExitCode { program: String, code: i32 },
    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Termination signals relayed from this process to the running child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardedSignal {
    Interrupt,
    Terminate,
    Hangup,
    Quit,
}

#[cfg(unix)]
impl From<ForwardedSignal> for nix::sys::signal::Signal {
    fn from(signal: ForwardedSignal) -> Self {
        match signal {
            ForwardedSignal::Interrupt => Self::SIGINT,
            ForwardedSignal::Terminate => Self::SIGTERM,
            ForwardedSignal::Hangup => Self::SIGHUP,
            ForwardedSignal::Quit => Self::SIGQUIT,
        }
    }
}

/// Starts a command with the terminal attached
pub trait Launcher {
    type Process: RunningProcess;

    /// # Errors
    ///
    /// Returns `ExecError::Launch` if the program cannot be started.
    fn launch(&self, command: &Command) -> Result<Self::Process, ExecError>;
}

/// A started child that can be waited on
pub trait RunningProcess {
    type Target: SignalTarget;

    /// Handle for delivering signals while [`RunningProcess::wait`] is pending
    fn signal_target(&self) -> Self::Target;

    /// Wait for the child to exit and return its exit code.
    ///
    /// A child killed by a signal reports `128 + signal`.
    fn wait(&mut self) -> impl Future<Output = io::Result<i32>>;
}

pub trait SignalTarget {
    /// # Errors
    ///
    /// Returns an error if the signal cannot be delivered to a live child.
    fn forward(&self, signal: ForwardedSignal) -> io::Result<()>;
}

/// Launches real OS processes inheriting stdin, stdout and stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    type Process = SystemProcess;

    fn launch(&self, command: &Command) -> Result<SystemProcess, ExecError> {
        let child = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ExecError::Launch {
                program: command.program.clone(),
                source,
            })?;
        debug!("Started `{}` (pid {:?})", command.program, child.id());
        Ok(SystemProcess { child })
    }
}

pub struct SystemProcess {
    child: tokio::process::Child,
}

impl RunningProcess for SystemProcess {
    type Target = ProcessId;

    fn signal_target(&self) -> ProcessId {
        ProcessId(self.child.id())
    }

    async fn wait(&mut self) -> io::Result<i32> {
        let status = self.child.wait().await?;
        Ok(exit_code(status))
    }
}

/// OS process id of a child, `None` once it has been reaped
#[derive(Debug, Clone, Copy)]
pub struct ProcessId(Option<u32>);

impl SignalTarget for ProcessId {
    #[cfg(unix)]
    fn forward(&self, signal: ForwardedSignal) -> io::Result<()> {
        use nix::errno::Errno;
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        let Some(pid) = self.0 else {
            return Ok(());
        };
        let pid = i32::try_from(pid).map_err(io::Error::other)?;
        match kill(Pid::from_raw(pid), nix::sys::signal::Signal::from(signal)) {
            // Child already exited, nothing left to signal
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(e) => Err(io::Error::other(e)),
        }
    }

    #[cfg(not(unix))]
    fn forward(&self, _signal: ForwardedSignal) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Wait for `process` to exit, relaying termination signals to `target`.
///
/// Installing the handlers also keeps this process alive on Ctrl+C, so it
/// always outlives the child and reports its real exit code.
///
/// # Errors
///
/// Returns an error if the signal handlers cannot be installed or waiting fails.
#[cfg(unix)]
pub async fn wait_forwarding_signals<P, T>(process: &mut P, target: &T) -> io::Result<i32>
where
    P: RunningProcess,
    T: SignalTarget,
{
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let mut quit = signal(SignalKind::quit())?;

    let wait = process.wait();
    tokio::pin!(wait);
    loop {
        let received = tokio::select! {
            code = &mut wait => return code,
            _ = interrupt.recv() => ForwardedSignal::Interrupt,
            _ = terminate.recv() => ForwardedSignal::Terminate,
            _ = hangup.recv() => ForwardedSignal::Hangup,
            _ = quit.recv() => ForwardedSignal::Quit,
        };
        debug!("Forwarding {received:?} to child");
        if let Err(e) = target.forward(received) {
            warn!("Unable to forward {received:?} to child: {e}");
        }
    }
}

/// Wait for `process` to exit while ignoring Ctrl+C.
///
/// The console already delivers Ctrl+C to every attached process.
///
/// # Errors
///
/// Returns an error if waiting fails.
#[cfg(not(unix))]
pub async fn wait_forwarding_signals<P, T>(process: &mut P, _target: &T) -> io::Result<i32>
where
    P: RunningProcess,
    T: SignalTarget,
{
    let wait = process.wait();
    tokio::pin!(wait);
    loop {
        tokio::select! {
            code = &mut wait => return code,
            _ = tokio::signal::ctrl_c() => debug!("Ctrl+C received while waiting for child"),
        }
    }
}
