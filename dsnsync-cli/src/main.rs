//! dsn-sync command-line tool
//!
//! Usage:
//!   dsnsync keygen
//!   dsnsync --key <hex> token --endpoint 007
//!   dsnsync --key <hex> verify <token>
//!
//! Logs go to stderr so command output can be piped.

use anyhow::Result;
use clap::Parser;
use dsnsync_cli::{run, Cli};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let output = run(&cli)?;
    println!("{output}");
    Ok(())
}
