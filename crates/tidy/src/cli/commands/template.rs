//! Template command

use clap::Args;
use console::style;
use tracing::info;

use tidy_commits::message_template;

use super::Workspace;
use crate::cli::output::path_style;
use crate::cli::Cli;

/// Print a commit message template for the schema
#[derive(Debug, Args)]
pub struct TemplateCommand {
    /// Write the template to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
}

impl TemplateCommand {
    /// Execute the template command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(output = ?self.output, "executing template command");
        let workspace = Workspace::open()?;
        let template = message_template(&workspace.schema);

        match &self.output {
            Some(path) => {
                std::fs::write(path, &template)?;
                if !cli.quiet {
                    println!(
                        "{} Template written to {}",
                        style("✓").green().bold(),
                        path_style().apply_to(path.display())
                    );
                }
            }
            None => print!("{template}"),
        }

        Ok(())
    }
}
