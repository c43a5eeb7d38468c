use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use env_logger::Env;
use log::debug;
use std::fs;
use std::process::ExitCode;

use rollcall::cli::{self, Cli, Command};
use rollcall::{AttendanceError, DATE_FORMAT, display};

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("{err:?}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let manager = rollcall::create_default_manager(cli.file)?;
    let path = manager.store().path().display().to_string();

    // Nothing else may touch the sheet if it cannot be created or repaired.
    manager.initialize_schema()?;

    match cli.command {
        Command::Init => {
            println!("Attendance sheet ready at {path}");
        }

        Command::Mark { rolls } => {
            let input = match rolls {
                Some(rolls) => rolls,
                None => cli::prompt_roll_numbers().context("Failed to read roll numbers")?,
            };

            let tokens = cli::parse_roll_tokens(&input);
            if tokens.is_empty() {
                return Ok(());
            }

            let today = Local::now().date_naive();
            println!("Marking attendance for {}", today.format(DATE_FORMAT));

            match manager.mark_attendance(&tokens, today) {
                Ok(outcome) => {
                    display::show_warnings(&outcome.warnings);
                    println!("{}", display::render_mark_outcome(&outcome));
                }
                Err(err) => {
                    if let AttendanceError::NoValidTokens { warnings } = &err {
                        display::show_warnings(warnings);
                    }
                    return Err(err.into());
                }
            }
        }

        Command::AddStudent { roll_number, name } => {
            manager.add_student(&roll_number, &name)?;
            println!("Added {} ({}) to {path}", roll_number.trim(), name.trim());
        }

        Command::Roster => {
            let sheet = manager.roster()?;
            println!("{}", display::render_roster(&sheet));
        }

        Command::Export { dest } => {
            let bytes = manager.export()?;
            fs::write(&dest, bytes)
                .with_context(|| format!("Failed to write {}", dest.display()))?;
            println!("Exported {path} to {}", dest.display());
        }
    }

    Ok(())
}
