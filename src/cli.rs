use clap::{ArgAction, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about, arg_required_else_help = true)]
pub struct Args {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read karun settings from this TOML file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub settings: Option<PathBuf>,

    /// Read repositories from this pacman.conf instead of the configured one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the repositories and database paths configured in pacman.conf
    Repos,

    /// List packages from the sync databases
    #[command(visible_alias = "ls")]
    List {
        /// Only this repository (installed packages from elsewhere are omitted)
        #[arg(short, long)]
        repo: Option<String>,

        /// Only installed packages
        #[arg(short, long)]
        installed: bool,

        /// Only installed packages whose version differs from the repository's
        #[arg(short, long)]
        out_of_sync: bool,
    },

    /// Search package names and descriptions, ignoring case
    #[command(arg_required_else_help = true)]
    Search {
        term: String,

        /// Only this repository
        #[arg(short, long)]
        repo: Option<String>,
    },
}
