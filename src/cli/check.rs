//! `bowser-render check`

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::template_content;
use crate::config::RenderConfig;
use crate::dom::parse_fragment;
use crate::templating::{Template, TemplateStats};
use crate::utils::read_text;

/// Parse and preprocess templates without rendering them.
///
/// Every file is checked even after a failure; the command fails if any
/// file did.
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Template files to check
    #[arg(value_name = "TEMPLATE", required = true)]
    pub templates: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One colored line per template
    Text,
    /// A JSON array of per-template results
    Json,
}

/// Outcome for one template.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub template: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elements: usize,
    pub loops: usize,
    pub conditionals: usize,
    pub interpolations: usize,
}

impl CheckCommand {
    /// Check every template and print a report.
    ///
    /// # Errors
    ///
    /// Returns an error naming the number of failed templates if any failed.
    pub async fn execute(self, config: &RenderConfig) -> Result<()> {
        let mut results = Vec::with_capacity(self.templates.len());
        for path in &self.templates {
            results.push(check_template(path, config).await);
        }

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            OutputFormat::Text => {
                for result in &results {
                    print_text(result);
                }
            }
        }

        let failed = results.iter().filter(|r| !r.valid).count();
        if failed > 0 {
            bail!("{failed} of {} template(s) failed to check", results.len());
        }
        Ok(())
    }
}

/// Check a single template. Failures are reported in the result, not raised.
pub async fn check_template(path: &Path, config: &RenderConfig) -> CheckResult {
    let outcome = compile(path, config).await;
    let (stats, error) = match outcome {
        Ok(stats) => (stats, None),
        Err(e) => {
            debug!("Check failed for {}: {e:#}", path.display());
            (TemplateStats::default(), Some(format!("{e:#}")))
        }
    };

    CheckResult {
        template: path.display().to_string(),
        valid: error.is_none(),
        error,
        elements: stats.elements,
        loops: stats.loops,
        conditionals: stats.conditionals,
        interpolations: stats.interpolations,
    }
}

async fn compile(path: &Path, config: &RenderConfig) -> Result<TemplateStats> {
    let source = read_text(path, "template").await?;
    let nodes = template_content(parse_fragment(&source)?);
    let template = Template::compile_with(&nodes, &config.directives);
    template.validate()?;
    Ok(template.stats())
}

fn print_text(result: &CheckResult) {
    match &result.error {
        None => println!(
            "{} {} ({} elements, {} loops, {} conditionals, {} interpolations)",
            "✓".green(),
            result.template,
            result.elements,
            result.loops,
            result.conditionals,
            result.interpolations
        ),
        Some(error) => println!("{} {}: {}", "✗".red(), result.template, error),
    }
}
