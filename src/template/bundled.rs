//! Templates compiled into the binary.
//!
//! The bundled prompt table is a process-wide read-only registry built once on
//! first use. Stores merge it with user overrides at construction time and
//! never mutate it.

use super::types::{DEFAULT_NAME, PromptTemplate};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::warn;

/// Bundled project skeletons as `(file name, JSON)` pairs.
pub(crate) const PROJECTS: &[(&str, &str)] = &[
    ("default.json", include_str!("assets/projects/default.json")),
    ("go-api.json", include_str!("assets/projects/go-api.json")),
    (
        "python-flask.json",
        include_str!("assets/projects/python-flask.json"),
    ),
    (
        "node-express.json",
        include_str!("assets/projects/node-express.json"),
    ),
];

/// Bundled prompt templates as `(file name, JSON)` pairs.
const PROMPTS: &[(&str, &str)] = &[
    ("default.json", include_str!("assets/prompts/default.json")),
    ("go.json", include_str!("assets/prompts/go.json")),
    ("python.json", include_str!("assets/prompts/python.json")),
    (
        "javascript.json",
        include_str!("assets/prompts/javascript.json"),
    ),
    ("java.json", include_str!("assets/prompts/java.json")),
];

const GENERIC_PROMPT: &str = "You are a senior software engineer. Generate a complete, working project for the user's request.\n\
Base package / module name: {{ .BasePackage }}\n\
{{ .ExtraPrompt }}\n\n\
Output every file in this exact format and nothing else:\n\
---FILE_PATH: relative/path/to/file\n\
<file content>\n\
---END_FILE\n";

static DEFAULT_PROMPTS: LazyLock<BTreeMap<String, PromptTemplate>> = LazyLock::new(|| {
    let mut prompts = BTreeMap::new();

    for (file, json) in PROMPTS {
        match serde_json::from_str::<PromptTemplate>(json) {
            Ok(prompt) => {
                prompts.insert(prompt.language.to_lowercase(), prompt);
            }
            Err(e) => warn!(file, error = %e, "invalid bundled prompt template"),
        }
    }

    prompts
        .entry(DEFAULT_NAME.to_string())
        .or_insert_with(|| generic_prompt().clone());

    prompts
});

static GENERIC: LazyLock<PromptTemplate> = LazyLock::new(|| PromptTemplate {
    language: DEFAULT_NAME.to_string(),
    description: "Generic project prompt".to_string(),
    template: GENERIC_PROMPT.to_string(),
});

/// The bundled prompt registry keyed by lowercased language.
pub(crate) fn default_prompts() -> &'static BTreeMap<String, PromptTemplate> {
    &DEFAULT_PROMPTS
}

/// Last-resort prompt used when no `default` entry is registered.
pub(crate) fn generic_prompt() -> &'static PromptTemplate {
    &GENERIC
}
