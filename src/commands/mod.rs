//! Command implementations for scaffold.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod generate;
mod list;

use crate::cli::{Command, TemplateDirArgs};
use crate::config::Config;
use crate::error::{Result, ScaffoldError};
use crate::template::TemplateStore;
use std::path::PathBuf;

pub use generate::{cmd_generate, run_generation};
pub use list::{cmd_languages, cmd_templates};

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Generate(args) => cmd_generate(args),
        Command::Templates(args) => cmd_templates(args),
        Command::Languages(args) => cmd_languages(args),
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| {
        ScaffoldError::UserError(format!("failed to read current directory: {}", e))
    })
}

/// Load the config, then the template store from the configured directory.
fn load_store(args: &TemplateDirArgs) -> Result<TemplateStore> {
    let config = Config::discover(args.config.as_deref(), &current_dir()?)?;
    let dir = args
        .templates_dir
        .clone()
        .unwrap_or(config.templates_dir);
    Ok(TemplateStore::load(Some(&dir)))
}
