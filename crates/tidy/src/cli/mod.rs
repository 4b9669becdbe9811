//! CLI definition and command handling

pub mod commands;
pub mod output;
pub mod prompt;

use clap::{Parser, Subcommand};

use commands::{
    CommitCommand, CompletionsCommand, LintCommand, LogCommand, SquashCommand, TemplateCommand,
};

/// git-tidy - structured commit messages for git
#[derive(Debug, Parser)]
#[command(name = "git-tidy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a structured commit of the staged changes
    Commit(CommitCommand),

    /// Print a commit message template for the schema
    Template(TemplateCommand),

    /// Render the commits of a range
    Log(LogCommand),

    /// Check the commits of a range against the schema
    Lint(LintCommand),

    /// Collapse the current branch into one structured commit
    Squash(SquashCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Commit(ref cmd) => cmd.execute(&self),
            Commands::Template(ref cmd) => cmd.execute(&self),
            Commands::Log(ref cmd) => cmd.execute(&self),
            Commands::Lint(ref cmd) => cmd.execute(&self),
            Commands::Squash(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }
}
