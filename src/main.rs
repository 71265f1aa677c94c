//! vizkit CLI entry point
//!
//! Parses arguments, runs the command and renders failures as user-friendly
//! errors with suggestions. Advisory failures (a missing UI file, a failed
//! package install) are reported as warnings and still exit 0.

use anyhow::Result;
use clap::Parser;
use vizkit_cli::cli;
use vizkit_cli::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
