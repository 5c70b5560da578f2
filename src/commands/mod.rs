//! Executable script steps
//!
//! A script body is a list of command lines. Each line is split into words with
//! shell-like quoting and becomes one [`command::Command`]: a program and its
//! arguments, run attached to the user's terminal. No shell is involved, so
//! pipes, redirects and variable expansion are passed through as plain words.

pub mod command;
pub mod words;
