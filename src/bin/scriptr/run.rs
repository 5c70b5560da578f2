use std::process::ExitCode;

use clap::Args;

use scriptr::output::Console;
use scriptr::process::SystemLauncher;
use scriptr::resolver::ScriptResolver;
use scriptr::run::RunOrchestrator;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Name of the script to run
    script: String,

    /// Extra arguments appended to the script's command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

/// Run a script, mapping failures to the process exit status.
///
/// # Errors
///
/// Never fails itself; script failures are printed and turned into an exit code.
pub async fn run(
    args: &RunArgs,
    resolver: ScriptResolver,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut orchestrator = RunOrchestrator::new(resolver, SystemLauncher, Console::stderr());
    match orchestrator.execute(&args.script, &args.args).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            orchestrator.into_console().error(&e.to_string());
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
