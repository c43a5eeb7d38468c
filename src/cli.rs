//! This module contains the command-line interface [`Cli`] parser for recording student attendance
//! on a roll-call sheet.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

/// The command line configuration struct, where the command-line interface parser is automatically
/// derived by [`clap::Parser`].
#[derive(Parser, Debug)]
#[command(name = "rollcall", version, about = "Student attendance sheet")]
pub struct Cli {
    /// The attendance sheet to use instead of the configured `store.path`.
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// The different commands available for managing the attendance sheet.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create the attendance sheet, or add missing columns to an existing one.
    Init,

    /// Mark students present for today.
    Mark {
        /// Comma-separated roll numbers (last three digits), e.g. `001,002`. Prompts when omitted.
        rolls: Option<String>,
    },

    /// Add a new student to the sheet.
    AddStudent { roll_number: String, name: String },

    /// Display the whole attendance sheet.
    Roster,

    /// Copy the attendance sheet to another file.
    Export { dest: PathBuf },
}

/// Splits comma-separated roll input into trimmed, non-empty tokens.
pub fn parse_roll_tokens(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Asks for roll numbers on stdin.
pub fn prompt_roll_numbers() -> io::Result<String> {
    print!("Enter Roll Numbers (comma-separated): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}
