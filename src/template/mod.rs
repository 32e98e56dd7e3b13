//! Project skeletons and system prompts.
//!
//! This module provides:
//!
//! - **Types**: `ProjectTemplate` and `PromptTemplate`
//! - **Store**: bundled templates merged with a user override directory
//! - **Render**: `{{ Name }}` variable substitution
//!
//! Skeleton files are rendered with `Package`; system prompts with
//! `BasePackage` and `ExtraPrompt`.

mod bundled;
mod render;
mod store;
mod types;

#[cfg(test)]
mod tests;

pub use render::{TemplateError, render, vars};
pub use store::TemplateStore;
pub use types::{DEFAULT_NAME, PromptTemplate, ProjectTemplate, SUPPORTED_LANGUAGES};
