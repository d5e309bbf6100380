//! Command dispatch logic for noteo

use std::env;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use crate::cli::{Cli, Commands, TagCommands};
use crate::commands;
use noteo_core::error::{NoteoError, Result};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let work_dir =
        env::current_dir().map_err(|e| NoteoError::io_operation("read", "working directory", e))?;

    debug!(elapsed = ?start.elapsed(), "resolve_work_dir");

    let ctx = CommandContext::new(cli, &work_dir, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub work_dir: &'a Path,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, work_dir: &'a Path, start: Instant) -> Self {
        Self {
            cli,
            work_dir,
            start,
        }
    }

    /// Directory given as a command argument, resolved against the working
    /// directory
    pub fn dir_arg(&self, dir: Option<&PathBuf>) -> PathBuf {
        match dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.work_dir.join(dir),
            None => self.work_dir.to_path_buf(),
        }
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("noteo {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("A command line note-taking assistant.");
        println!();
        println!("Run `noteo --help` for usage information.");
        Ok(())
    }
}

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        if ctx.cli.verbose {
            debug!(command = ?self, "dispatch");
        }
        match self {
            Commands::Init => commands::init::execute(ctx.work_dir),
            Commands::Add { text } => commands::add::execute(ctx.work_dir, text),
            Commands::Ls(args) => block_on(commands::ls::execute(ctx, args)),
            Commands::Tag { command } => execute_tag(ctx, command),
            Commands::Mv { source, target } => {
                block_on(commands::mv::execute(ctx.work_dir, source, target))
            }
        }
    }
}

fn execute_tag(ctx: &CommandContext, command: &TagCommands) -> Result<()> {
    match command {
        TagCommands::Set { name, stdin, files } => {
            commands::tag::set(ctx.work_dir, name.as_deref(), *stdin, files)
        }
        TagCommands::Rm {
            name,
            grep,
            stdin,
            files,
        } => commands::tag::rm(ctx.work_dir, name.as_deref(), grep.as_deref(), *stdin, files),
        TagCommands::Ls { dir } => block_on(commands::tag::ls(&ctx.dir_arg(dir.as_ref()))),
    }
}

/// Drive an async command on a fresh multi-threaded runtime.
fn block_on<F>(future: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| NoteoError::io_operation("start", "async runtime", e))?;
    runtime.block_on(future)
}
