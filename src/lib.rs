//! Core implementation of the scriptr command dispatcher
//!
//! Scripts are named command lines defined in `scriptr.yml` files. Several
//! files can be layered through an ordered list of lookup paths (by default the
//! working directory, then `~/scriptr`). Running a script resolves its
//! definition from the highest precedence file, warns when other files define
//! it too, and runs each command attached to the terminal, stopping at the
//! first failure.

use log::warn;

use crate::lookup::{HOME_CONFIG_DIR, LookupPaths, home_dir};

pub mod commands;
pub mod config_file;
pub mod logger;
pub mod lookup;
pub mod output;
pub mod process;
pub mod resolver;
pub mod run;
pub mod usage;

/// Environment variable enabling diagnostic output, accepts `1` or `true`
pub const VERBOSE_ENV: &str = "SCRIPTR_VERBOSE";

/// Returns true if [`VERBOSE_ENV`] is set to a truthy value
#[must_use]
pub fn verbose_from_env() -> bool {
    std::env::var(VERBOSE_ENV)
        .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Lookup paths for a normal run: the working directory, then `~/scriptr`.
///
/// Sources that cannot be registered are logged and skipped.
#[must_use]
pub fn default_lookup_paths() -> LookupPaths {
    let mut lookup = LookupPaths::new();
    match std::env::current_dir() {
        Ok(cwd) => {
            if let Err(e) = lookup.add_lookup_path(cwd) {
                warn!("Skipping working directory: {e}");
            }
        }
        Err(e) => warn!("Unknown working directory: {e}"),
    }
    match home_dir() {
        Some(home) => {
            if let Err(e) = lookup.add_lookup_path(home.join(HOME_CONFIG_DIR)) {
                warn!("Skipping home scripts directory: {e}");
            }
        }
        None => warn!("Unable to determine home directory"),
    }
    lookup
}
