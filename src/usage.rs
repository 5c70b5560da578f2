use std::fmt::Write;

use log::debug;

use crate::resolver::ScriptResolver;

/// Format the "Available Scripts" help section
#[must_use]
pub fn available_scripts_section(scripts: &[String]) -> String {
    let mut section = String::from("Available Scripts:\n");
    for script in scripts {
        let _ = writeln!(section, "  {script}");
    }
    section
}

/// Help text listing every known script, or `None` if the config cannot be read.
///
/// The failure is only reported when `verbose` is set, so a broken config file
/// never prevents showing usage.
#[must_use]
pub fn run_after_help(resolver: &ScriptResolver, verbose: bool) -> Option<String> {
    match resolver.parse_available_scripts() {
        Ok(scripts) => Some(available_scripts_section(&scripts)),
        Err(e) => {
            debug!("Unable to list available scripts: {e}");
            if verbose {
                eprintln!(
                    "$ got an error trying to add available scripts to command usage; error: {e}"
                );
            }
            None
        }
    }
}
