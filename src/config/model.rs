//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a scaffold run.
///
/// This struct represents the contents of `scaffold.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Output settings
    // =========================================================================
    /// Directory generated files are written under.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Module/package path substituted into templates.
    #[serde(default = "default_base_package")]
    pub base_package: String,

    // =========================================================================
    // Engine settings
    // =========================================================================
    /// Number of writer threads.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Task queue capacity.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    // =========================================================================
    // Template settings
    // =========================================================================
    /// Project template name.
    #[serde(default = "default_template")]
    pub template: String,

    /// Target language when the template does not fix one.
    #[serde(default = "default_language")]
    pub language: String,

    /// Directory with user templates overriding the bundled ones.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    // =========================================================================
    // Model settings
    // =========================================================================
    #[serde(default = "default_model")]
    pub model: String,

    /// Chat-completions endpoint. Anthropic URLs switch the wire format.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout for the model call.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    // =========================================================================
    // Progress settings
    // =========================================================================
    /// Append NDJSON progress events to this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_log: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            base_package: default_base_package(),
            worker_count: default_worker_count(),
            queue_capacity: default_queue_capacity(),
            template: default_template(),
            language: default_language(),
            templates_dir: default_templates_dir(),
            model: default_model(),
            api_url: default_api_url(),
            timeout_seconds: default_timeout_seconds(),
            api_key_env: default_api_key_env(),
            event_log: None,
        }
    }
}

/// Values given on the command line; `Some` replaces the file value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub base_package: Option<String>,
    pub worker_count: Option<usize>,
    pub template: Option<String>,
    pub language: Option<String>,
    pub templates_dir: Option<PathBuf>,
    pub model: Option<String>,
    pub api_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub event_log: Option<PathBuf>,
}
