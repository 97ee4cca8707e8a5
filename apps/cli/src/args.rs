//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use gpm::{GroupKey, Permission};
use gpm_logger::LevelFilter;
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "gpm")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Constant-time group permission checks")]
pub(crate) struct Cli {
    /// Registry seed file (TOML, JSON, YAML, ...); overridable with GPM__ variables
    #[arg(long, short, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Minimum log level
    #[arg(long, global = true, default_value = "warn")]
    pub(crate) log_level: LevelFilter,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub(crate) json: bool,

    /// Defaults to `walkthrough`.
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Debug, Default, Subcommand)]
pub(crate) enum Command {
    /// Run the built-in write/read permission example
    #[default]
    Walkthrough,
    /// Check whether a group holds the required permissions
    Check {
        /// Group key to look up
        #[arg(long, short)]
        group: GroupKey,
        /// Required permissions, e.g. `0b101`, `0x5` or `1 | 4`
        #[arg(long, short, value_parser = Permission::parse)]
        require: Permission,
    },
    /// List every group of the seeded registry
    List,
}
