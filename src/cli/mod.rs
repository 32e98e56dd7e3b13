//! CLI argument parsing for scaffold.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::config::Overrides;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Scaffold: generate a project from a natural-language prompt.
///
/// A project template seeds the skeleton, a language model writes the rest,
/// and every file is written concurrently under the output directory.
#[derive(Parser, Debug)]
#[command(name = "scaffold")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for scaffold.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a project from a prompt.
    ///
    /// Renders the template skeleton, queries the model, and writes every
    /// returned file under the output directory.
    Generate(GenerateArgs),

    /// List available project templates.
    Templates(ListArgs),

    /// List languages that have a prompt template.
    Languages(ListArgs),
}

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Description of the project to generate.
    #[arg(required = true, num_args = 1..)]
    pub prompt: Vec<String>,

    /// Output directory for generated files.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Base package (module path) used in generated code.
    #[arg(short = 'p', long)]
    pub base_package: Option<String>,

    /// Number of concurrent writer threads.
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Project template to use.
    #[arg(short, long)]
    pub template: Option<String>,

    /// Programming language for the project.
    #[arg(short, long)]
    pub language: Option<String>,

    /// Model name.
    #[arg(long)]
    pub model: Option<String>,

    /// Chat-completions endpoint URL.
    #[arg(long)]
    pub api_url: Option<String>,

    /// API key (defaults to the variable named by `api_key_env`).
    #[arg(long)]
    pub api_key: Option<String>,

    /// Timeout for the model call, in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub templates: TemplateDirArgs,

    /// Append progress events as NDJSON to this file.
    #[arg(long)]
    pub event_log: Option<PathBuf>,
}

impl GenerateArgs {
    /// The prompt words joined with single spaces.
    pub fn prompt_text(&self) -> String {
        self.prompt.join(" ")
    }

    /// Flag values that replace config file values.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            output_dir: self.output_dir.clone(),
            base_package: self.base_package.clone(),
            worker_count: self.workers,
            template: self.template.clone(),
            language: self.language.clone(),
            templates_dir: self.templates.templates_dir.clone(),
            model: self.model.clone(),
            api_url: self.api_url.clone(),
            timeout_seconds: self.timeout,
            event_log: self.event_log.clone(),
        }
    }
}

/// Arguments for the listing commands.
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub templates: TemplateDirArgs,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Where templates and config come from.
#[derive(Args, Debug, Clone, Default)]
pub struct TemplateDirArgs {
    /// Directory with user templates overriding the bundled ones.
    #[arg(long)]
    pub templates_dir: Option<PathBuf>,

    /// Config file (defaults to ./scaffold.yaml when present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Default log filter for the verbosity flags.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
