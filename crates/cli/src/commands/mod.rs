//! CLI commands module.

use crate::config::Config;
use anyhow::Result;
use clap::Subcommand;

mod account;

#[derive(Subcommand)]
pub enum Commands {
    /// Account derivation and address checks
    Account(account::AccountArgs),
}

pub fn run(cmd: Commands, config: &Config) -> Result<()> {
    match cmd {
        Commands::Account(args) => account::run(args, config),
    }
}
