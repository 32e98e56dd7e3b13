//! Scaffold: prompt-driven project generation.
//!
//! A run renders a project skeleton from a template, asks a language model
//! for the remaining files, extracts `---FILE_PATH:` blocks from the reply,
//! and writes every file through a pool of writer threads that guarantees
//! at most one write per path.

pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod generator;
pub mod parser;
pub mod progress;
pub mod query;
pub mod template;

#[cfg(test)]
pub(crate) mod test_support;
