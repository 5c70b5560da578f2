use std::process::ExitCode;

use scriptr::resolver::ScriptResolver;

/// Print every available script name, one per line.
///
/// # Errors
///
/// Returns an error if a config file cannot be read or parsed.
pub fn run(resolver: &ScriptResolver) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let scripts = resolver.parse_available_scripts()?;
    if scripts.is_empty() {
        eprintln!("No scripts found.");
    }
    for script in scripts {
        println!("{script}");
    }
    Ok(ExitCode::SUCCESS)
}
