//! `git-tidy completions`

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::{output, Cli};

/// Print a completion script for the `git-tidy` binary, e.g.
/// `git-tidy completions zsh > ~/.zfunc/_git-tidy`
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CompletionsCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(shell = %self.shell, "generating completions");

        match &self.output {
            Some(path) => {
                let mut file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                write_completions(self.shell, &mut file);
                if !cli.quiet {
                    output::success(&format!("Completions written to {}", path.display()));
                }
            }
            None => write_completions(self.shell, &mut io::stdout()),
        }

        Ok(())
    }
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use clap::Parser;

    #[test]
    fn test_parse_shell() {
        let cli = Cli::try_parse_from(["git-tidy", "completions", "fish"]).unwrap();
        match cli.command {
            Commands::Completions(cmd) => {
                assert_eq!(cmd.shell, Shell::Fish);
                assert!(cmd.output.is_none());
            }
            _ => panic!("expected completions"),
        }
        assert!(Cli::try_parse_from(["git-tidy", "completions", "tcsh"]).is_err());
    }

    #[test]
    fn test_script_covers_subcommands() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("git-tidy"));
        assert!(script.contains("squash"));
        assert!(script.contains("--recover"));
    }
}
