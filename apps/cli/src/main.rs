#![allow(clippy::print_stdout)]

mod args;
mod commands;
mod walkthrough;

use crate::args::{Cli, Command};
use anyhow::Result;
use clap::Parser;
use gpm_logger::Logger;
use std::io::IsTerminal;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logger = Logger::builder(env!("CARGO_PKG_NAME"))
        .level(cli.log_level)
        .json(cli.json)
        .stderr(true)
        .ansi(std::io::stderr().is_terminal())
        .init()?;

    match cli.command.unwrap_or_default() {
        Command::Walkthrough => walkthrough::run()?,
        Command::Check { group, require } => {
            let registry = commands::load(cli.config.as_deref())?;
            commands::check(&registry, group, require)?;
        },
        Command::List => {
            let registry = commands::load(cli.config.as_deref())?;
            commands::list(&registry);
        },
    }

    Ok(())
}
