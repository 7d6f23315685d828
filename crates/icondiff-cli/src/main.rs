//! icondiff CLI - Sprite-level diffs for icon sheets
//!
//! This binary compares versions of icon sheets and reports which sprites
//! were added, removed or modified.

use clap::Parser;
use std::process::ExitCode;

use icondiff_cli::{commands, logging};

mod cli_args;

use cli_args::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(logging::LogSettings::from_flags(cli.verbose, cli.log_json));

    let result = match cli.command {
        Commands::Compare {
            before,
            after,
            name,
            out,
            json,
            encode,
        } => commands::compare::run(
            before.as_deref(),
            after.as_deref(),
            name.as_deref(),
            out.as_deref(),
            &encode.to_config(),
            json,
        ),
        Commands::CompareDirs {
            before,
            after,
            out,
            json,
            encode,
        } => commands::compare_dirs::run(&before, &after, out.as_deref(), &encode.to_config(), json),
        Commands::Inspect {
            input,
            json,
            encode,
        } => commands::inspect::run(&input, &encode.to_config(), json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
