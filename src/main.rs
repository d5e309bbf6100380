//! Noteo - command line note-taking assistant
//!
//! Keeps markdown notes with YAML front matter in a plain directory tree,
//! and lists, tags and moves them.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use cli::Cli;
use noteo_core::error::ExitCode as NoteoExitCode;
use noteo_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = Cli::parse();

    // Initialize structured logging
    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => ExitCode::from(NoteoExitCode::Success as u8),
        Err(e) => {
            if cli.log_json {
                eprintln!("{}", e.to_json());
            } else if e.is_not_repository() {
                eprintln!("{}", e);
                eprintln!("Please run `noteo init`");
            } else {
                eprintln!("error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
