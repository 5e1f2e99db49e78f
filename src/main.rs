mod cli;
mod command;
mod error;
mod logging;

use crate::cli::{Args, Command};
use crate::command::Context;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use karun_config::Settings;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::setup_logging(args.verbose);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: Args) -> Result<()> {
    let mut settings = Settings::load(args.settings.as_deref()).or_raise(|| ErrorKind::Settings)?;
    if let Some(config) = args.config {
        settings.pacman_conf = config;
    }
    let context = Context::new(settings);
    match args.command {
        Command::Repos => context.repos(),
        Command::List { repo, installed, out_of_sync } => context.list(repo, installed, out_of_sync),
        Command::Search { term, repo } => context.search(&term, repo),
    }
}
