//! `bowser-render render`

use anyhow::{Context as _, Result};
use clap::Args;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{debug, info};

use super::template_content;
use crate::config::RenderConfig;
use crate::core::BowserError;
use crate::dom::{parse_fragment, to_html};
use crate::templating::{Context, Renderer, parse_assignment};
use crate::utils::{atomic_write, read_text};

/// Render a template file against a JSON context.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Template file to render
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// JSON file holding the context object
    #[arg(long, value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Set a context variable; the value is parsed as JSON, else kept as a string
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// Write the output here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Indent nested elements
    #[arg(long)]
    pub pretty: bool,
}

impl RenderCommand {
    /// Render and write the result.
    ///
    /// # Errors
    ///
    /// Returns an error if any input cannot be read or parsed, if the render
    /// fails, or if the output cannot be written.
    pub async fn execute(self, config: &RenderConfig) -> Result<()> {
        let html = self.render_to_string(config).await?;

        match &self.output {
            Some(path) => {
                atomic_write(path, html.as_bytes()).await?;
                info!("Wrote {}", path.display());
            }
            None => println!("{html}"),
        }
        Ok(())
    }

    /// Render without writing anything.
    ///
    /// # Errors
    ///
    /// See [`RenderCommand::execute`].
    pub async fn render_to_string(&self, config: &RenderConfig) -> Result<String> {
        let source = read_text(&self.template, "template").await?;
        let nodes = parse_fragment(&source)
            .with_context(|| format!("Failed to parse template {}", self.template.display()))?;
        let nodes = template_content(nodes);

        let context = self.build_context().await?;
        debug!(variables = context.names().count(), "Built render context");

        let renderer = Renderer::with_directives(config.directives.clone());
        let output = renderer
            .render(&nodes, &context)
            .with_context(|| format!("Failed to render {}", self.template.display()))?;

        Ok(to_html(&output, self.pretty || config.output.pretty))
    }

    /// The context file, with `--var` assignments deep-merged on top.
    async fn build_context(&self) -> Result<Context> {
        let mut context = match &self.context {
            Some(path) => {
                let json = read_text(path, "context file").await?;
                Context::from_json(&json)
                    .with_context(|| format!("Invalid context file {}", path.display()))?
            }
            None => Context::new(),
        };

        let mut overrides = Map::new();
        for assignment in &self.vars {
            let (name, value) =
                parse_assignment(assignment).ok_or_else(|| BowserError::InvalidContext {
                    reason: format!("--var expects NAME=VALUE, got '{assignment}'"),
                })?;
            overrides.insert(name, value);
        }
        context.merge(&Value::Object(overrides))?;

        Ok(context)
    }
}
