//! Project and prompt template definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the template (and prompt language) that always resolves.
pub const DEFAULT_NAME: &str = "default";

/// Target languages that get a synthesized `<lang>-default` project template
/// when no templates load from any source.
pub const SUPPORTED_LANGUAGES: &[&str] = &["go", "python", "javascript", "java"];

/// A named project skeleton.
///
/// Loaded from JSON of the form:
///
/// ```json
/// {
///   "name": "go-api",
///   "description": "HTTP API in Go",
///   "language": "go",
///   "prompt": "Use only the standard library.",
///   "files": { "go.mod": "module {{ .Package }}\n" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTemplate {
    /// Identifier used by `--template`.
    pub name: String,

    /// Human-readable summary.
    #[serde(default)]
    pub description: String,

    /// Target language. When non-empty it overrides the requested language.
    #[serde(default)]
    pub language: String,

    /// Extra instructions appended to the system prompt as `ExtraPrompt`.
    #[serde(default)]
    pub prompt: String,

    /// Skeleton files: relative path to content template.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

impl ProjectTemplate {
    /// An empty skeleton with no files and no extra prompt.
    pub fn empty(
        name: impl Into<String>,
        language: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            language: language.into(),
            prompt: String::new(),
            files: BTreeMap::new(),
        }
    }
}

/// A system prompt template for one target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Language key (`go`, `python`, ..., or `default`).
    pub language: String,

    /// Human-readable summary.
    #[serde(default)]
    pub description: String,

    /// Prompt body; rendered with `BasePackage` and `ExtraPrompt`.
    pub template: String,
}
