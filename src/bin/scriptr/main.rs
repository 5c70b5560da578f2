mod list;
mod run;

use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use scriptr::logger;
use scriptr::resolver::ScriptResolver;

/// Environment variable naming a file that receives a copy of all log lines
const LOG_FILE_ENV: &str = "SCRIPTR_LOG_FILE";

#[derive(Parser, Debug)]
#[command(
    name = "scriptr",
    version,
    about = "Run scripts defined in layered scriptr.yml files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a script defined in scriptr.yml in the working directory or in ~/scriptr
    Run(run::RunArgs),
    /// List the scripts defined in all config files
    List,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let verbose = scriptr::verbose_from_env();
    let log_file = std::env::var_os(LOG_FILE_ENV)
        .map(std::fs::File::create)
        .transpose()?;
    logger::init(logger::default_filter(verbose), log_file)?;

    let resolver = ScriptResolver::new(scriptr::default_lookup_paths());

    // List known scripts under `run --help`
    let mut command = Cli::command();
    if let Some(help) = scriptr::usage::run_after_help(&resolver, verbose) {
        command = command.mut_subcommand("run", |run| run.after_help(help));
    }
    let cli = Cli::from_arg_matches(&command.get_matches())?;

    match cli.command {
        Commands::Run(ref args) => run::run(args, resolver).await,
        Commands::List => list::run(&resolver),
    }
}
