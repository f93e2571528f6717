//! bowser-render CLI entry point
//!
//! Parses arguments, runs the command and prints errors with suggestions.

use anyhow::Result;
use bowser_render::cli;
use bowser_render::core::user_friendly_error;
use clap::Parser;

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
