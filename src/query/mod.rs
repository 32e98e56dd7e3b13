//! Model query seam.
//!
//! The generator only sees [`CodeQuery`]; [`openai::ChatClient`] is the
//! HTTP implementation used by the CLI.

pub mod openai;

use thiserror::Error;

/// Text returned by a model for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    /// The reply body the file blocks are extracted from.
    pub primary_text: String,
}

/// A model that turns a system prompt and a user prompt into text.
pub trait CodeQuery: Send + Sync {
    fn query(&self, system_prompt: &str, user_prompt: &str) -> Result<QueryResponse, QueryError>;
}

/// Failure to obtain a reply from the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The client was built with a blank API key.
    #[error("API key is empty: pass --api-key or set it in the environment")]
    MissingApiKey,

    /// The HTTP client could not be built or the request did not complete.
    #[error("request failed: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("API returned status {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The response carried no completion.
    #[error("model returned no completion")]
    EmptyResponse,
}
