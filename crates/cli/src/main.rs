//! vsys CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "vsys")]
#[command(about = "Derive and check V-style chain accounts", long_about = None)]
struct Cli {
    /// Path to a JSON config file (defaults to ./vsys.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<commands::Commands>,
}

fn init_logging(config: &Config, verbose: u8) -> Result<()> {
    let level = config.level(verbose)?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref())?;
    init_logging(&config, cli.verbose)?;
    tracing::debug!(chain = %config.chain, nonce = config.nonce, "loaded config");

    match cli.command {
        Some(cmd) => commands::run(cmd, &config),
        None => {
            println!("vsys - derive and check V-style chain accounts");
            println!("Run 'vsys --help' for usage information.");
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
