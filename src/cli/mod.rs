//! Command-line interface for bowser-render.
//!
//! # Commands
//!
//! - `render` - render a template file against a JSON context
//! - `check` - parse and preprocess templates without rendering them
//!
//! # Global Options
//!
//! - `--verbose` - log directive decisions and loop expansion
//! - `--quiet` - log errors only
//! - `--config` - path to a `bowser.toml` settings file
//!
//! # Example
//!
//! ```bash
//! bowser-render render page.html --context data.json --var title='"Home"'
//! bowser-render check templates/*.html
//! ```

mod check;
mod render;

pub use check::{CheckCommand, OutputFormat};
pub use render::RenderCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::RenderConfig;
use crate::dom::Node;

/// Runtime options derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can drive commands without going
/// through argument parsing.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Filter directive for the log subscriber; `RUST_LOG` wins when set
    pub log_level: Option<String>,
    /// Explicit config file; must exist when given
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber. Later calls are no-ops.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if let Some(level) = &self.log_level {
            EnvFilter::new(level)
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser)]
#[command(
    name = "bowser-render",
    about = "Render attribute-directive HTML templates",
    version,
    long_about = "bowser-render expands if/loop attribute directives and $$(expression) markers in HTML template fragments against a JSON context."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a config file (default: ./bowser.toml, then ~/.bowser/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template against a JSON context
    Render(RenderCommand),

    /// Parse and preprocess templates, reporting directive counts
    Check(CheckCommand),
}

impl Cli {
    /// Run the parsed command.
    ///
    /// # Errors
    ///
    /// Returns any error from loading configuration or from the command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            config_path: self.config.clone(),
        }
    }

    /// Run the parsed command with explicit runtime options.
    ///
    /// # Errors
    ///
    /// Returns any error from loading configuration or from the command.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();
        let settings = RenderConfig::load_with_optional(config.config_path).await?;

        match self.command {
            Commands::Render(cmd) => cmd.execute(&settings).await,
            Commands::Check(cmd) => cmd.execute(&settings).await,
        }
    }
}

/// Unwrap a fragment that is a single `<template>` element to its children.
///
/// Whitespace-only text around the element is ignored when deciding.
pub(crate) fn template_content(nodes: Vec<Node>) -> Vec<Node> {
    let mut significant = nodes.iter().filter(|node| match node {
        Node::Text(text) => !text.trim().is_empty(),
        _ => true,
    });

    let is_lone_template = matches!(
        (significant.next(), significant.next()),
        (Some(Node::Element(element)), None) if element.tag.eq_ignore_ascii_case("template")
    );
    if !is_lone_template {
        return nodes;
    }

    nodes
        .into_iter()
        .find_map(|node| match node {
            Node::Element(element) => Some(element.children),
            _ => None,
        })
        .unwrap_or_default()
}
