//! Command-line argument parsing
//!
//! This module defines the CLI structure using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;

/// filterlist-index - publish an index of filter lists maintained in forks
#[derive(Parser, Debug)]
#[command(
    name = "filterlist_index",
    version,
    about = "Build a titled, deduplicated index of filter lists published by repository forks",
    long_about = "Walks every fork of a reference repository, collects the filter list manifests that \
are still released, drops manifests that repeat an earlier one, looks up a title for every filter \
list and writes the result as a JSONP script."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk all forks and write the index
    Generate(GenerateArgs),

    /// Rebuild the index from saved snapshots without network access
    Render(RenderArgs),

    /// Print the title of one filter list
    Title(TitleArgs),

    /// Print the URLs a local manifest file yields
    Parse(ParseArgs),
}

/// Arguments for the generate command
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Owner of the reference repository
    #[arg(long)]
    pub owner: Option<String>,

    /// Name of the reference repository
    #[arg(long)]
    pub repo: Option<String>,

    /// Output file for the JSONP index
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory for intermediate JSON snapshots
    #[arg(long, value_name = "DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Number of concurrent title workers
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,
}

/// Arguments for the render command
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Deduplicated manifest snapshot
    #[arg(long, value_name = "FILE")]
    pub lists: PathBuf,

    /// Title snapshot
    #[arg(long, value_name = "FILE")]
    pub titles: PathBuf,

    /// Output file for the JSONP index
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the title command
#[derive(Args, Debug, Clone)]
pub struct TitleArgs {
    /// Filter list URL
    pub url: String,
}

/// Arguments for the parse command
#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Manifest file to parse
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

impl GenerateArgs {
    /// Check argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == Some(0) {
            return Err("Number of workers must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Flags that override file and environment configuration
    pub fn overrides(&self) -> Overrides {
        Overrides {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            output: self.output.clone(),
            snapshot_dir: self.snapshot_dir.clone(),
            workers: self.workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_args_validation() {
        let mut args = GenerateArgs::default();
        assert!(args.validate().is_ok());

        args.workers = Some(0);
        assert!(args.validate().is_err());

        args.workers = Some(4);
        assert!(args.validate().is_ok());
        assert_eq!(args.overrides().workers, Some(4));
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "filterlist_index",
            "-v",
            "generate",
            "--owner",
            "someone",
            "--output",
            "out.js",
            "--workers",
            "3",
        ])
        .unwrap();

        assert!(cli.global.verbose);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.owner.as_deref(), Some("someone"));
                assert_eq!(args.output, Some(PathBuf::from("out.js")));
                assert_eq!(args.workers, Some(3));
                assert!(args.repo.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_render_requires_snapshots() {
        assert!(Cli::try_parse_from(["filterlist_index", "render", "--lists", "l.json"]).is_err());
        assert!(Cli::try_parse_from([
            "filterlist_index",
            "render",
            "--lists",
            "l.json",
            "--titles",
            "t.json"
        ])
        .is_ok());
    }

    #[test]
    fn test_log_level() {
        let cli_quiet = Cli::try_parse_from(["filterlist_index", "-q", "parse", "lists.txt"]).unwrap();
        let cli_verbose =
            Cli::try_parse_from(["filterlist_index", "parse", "lists.txt", "-v"]).unwrap();
        let cli_debug =
            Cli::try_parse_from(["filterlist_index", "--very-verbose", "title", "https://x.example/"])
                .unwrap();
        let cli_default = Cli::try_parse_from(["filterlist_index", "parse", "lists.txt"]).unwrap();

        assert_eq!(cli_quiet.log_level(), tracing::Level::ERROR);
        assert_eq!(cli_verbose.log_level(), tracing::Level::INFO);
        assert_eq!(cli_debug.log_level(), tracing::Level::DEBUG);
        assert_eq!(cli_default.log_level(), tracing::Level::WARN);
    }
}
