//! CLI argument parsing for noteo
//!
//! Global flags: --verbose, --log-level, --log-json

pub mod args;
pub mod tag;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use args::LsArgs;
pub use tag::TagCommands;

/// Noteo - command line note-taking assistant
#[derive(Parser, Debug)]
#[command(name = "noteo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log debug details to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "NOTEO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a Noteo repository in the current directory
    Init,

    /// Add a new note in the current working directory
    #[command(visible_aliases = ["create", "new"])]
    Add {
        /// Note text; opens the editor when omitted
        text: Vec<String>,
    },

    /// List notes summary
    Ls(LsArgs),

    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Move a note or directory, updating links pointing at it
    Mv {
        /// File or directory to move
        source: PathBuf,

        /// New path, or an existing directory to move into
        target: PathBuf,
    },
}
