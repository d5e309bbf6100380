use std::path::PathBuf;

use clap::Subcommand;

/// Tag subcommands
#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Set a tag on notes
    #[command(visible_aliases = ["add", "update"])]
    Set {
        /// Short name without spaces; can have the form name:number-or-date
        #[arg(long, short)]
        name: Option<String>,

        /// Read file names from standard input, one per line
        #[arg(long)]
        stdin: bool,

        /// Note files to tag
        files: Vec<PathBuf>,
    },

    /// Remove tags from notes
    Rm {
        /// Exact tag to remove
        #[arg(long, short, conflicts_with = "grep")]
        name: Option<String>,

        /// Regular expression matching the tag to remove
        #[arg(long)]
        grep: Option<String>,

        /// Read file names from standard input, one per line
        #[arg(long)]
        stdin: bool,

        /// Note files to untag
        files: Vec<PathBuf>,
    },

    /// List all tags
    Ls {
        /// Directory to list, relative to the current one
        dir: Option<PathBuf>,
    },
}
