//! Error types for the scaffold CLI.
//!
//! Uses thiserror for derive macros. Only configuration problems, missing
//! templates and model query failures surface here; per-file problems during a
//! run are reported through the progress channel instead.

use crate::dispatch::EngineError;
use crate::exit_codes;
use crate::query::QueryError;
use crate::template::TemplateError;
use thiserror::Error;

/// Main error type for scaffold operations.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// The requested project template is not registered.
    #[error("template '{name}' not found (available: {available})")]
    TemplateNotFound {
        /// The requested template name.
        name: String,
        /// Comma-separated list of known template names.
        available: String,
    },

    /// The system prompt template could not be rendered.
    #[error("error rendering prompt template for language '{language}': {source}")]
    PromptRender {
        /// Language whose prompt template failed.
        language: String,
        /// Underlying render error.
        #[source]
        source: TemplateError,
    },

    /// The model query failed.
    #[error("error querying model: {0}")]
    Query(#[from] QueryError),

    /// The dispatch engine was used out of order.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ScaffoldError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScaffoldError::UserError(_) => exit_codes::USER_ERROR,
            ScaffoldError::TemplateNotFound { .. } => exit_codes::TEMPLATE_FAILURE,
            ScaffoldError::PromptRender { .. } => exit_codes::TEMPLATE_FAILURE,
            ScaffoldError::Query(QueryError::MissingApiKey) => exit_codes::USER_ERROR,
            ScaffoldError::Query(_) => exit_codes::QUERY_FAILURE,
            ScaffoldError::Engine(_) => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for scaffold operations.
pub type Result<T> = std::result::Result<T, ScaffoldError>;
