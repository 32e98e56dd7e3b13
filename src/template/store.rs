//! Template store: bundled templates merged with a user override directory.
//!
//! # Loading precedence
//!
//! 1. Bundled project templates and the bundled prompt registry
//! 2. `<override_dir>/*.json` (project templates) and
//!    `<override_dir>/prompts/*.json` (prompt templates)
//!
//! An override with the same name (or prompt language) replaces the bundled
//! entry. Files that cannot be read or parsed are skipped with a warning; the
//! store itself never fails to load.

use super::bundled;
use super::types::{DEFAULT_NAME, PromptTemplate, ProjectTemplate, SUPPORTED_LANGUAGES};
use crate::error::{Result, ScaffoldError};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Read-only set of project and prompt templates for one process.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates: BTreeMap<String, ProjectTemplate>,
    prompts: BTreeMap<String, PromptTemplate>,
}

impl TemplateStore {
    /// Load bundled templates, then apply overrides from `override_dir` if it
    /// exists.
    pub fn load(override_dir: Option<&Path>) -> Self {
        Self::from_sources(bundled::PROJECTS, bundled::default_prompts(), override_dir)
    }

    /// Build a store from explicit bundled sources.
    pub(crate) fn from_sources(
        bundled_projects: &[(&str, &str)],
        bundled_prompts: &BTreeMap<String, PromptTemplate>,
        override_dir: Option<&Path>,
    ) -> Self {
        let mut templates = BTreeMap::new();
        let mut loaded = 0usize;

        for (file, json) in bundled_projects {
            if let Some(tmpl) = parse_project(file, json) {
                debug!(name = %tmpl.name, language = %tmpl.language, "loaded bundled template");
                templates.insert(tmpl.name.clone(), tmpl);
                loaded += 1;
            }
        }

        let mut prompts = bundled_prompts.clone();

        if let Some(dir) = override_dir {
            for (file, json) in read_json_dir(dir) {
                let Some(tmpl) = parse_project(&file, &json) else {
                    continue;
                };
                if templates.contains_key(&tmpl.name) {
                    info!(name = %tmpl.name, "user template overrides bundled template with same name");
                }
                debug!(name = %tmpl.name, language = %tmpl.language, "loaded user template");
                templates.insert(tmpl.name.clone(), tmpl);
                loaded += 1;
            }

            for (file, json) in read_json_dir(&dir.join("prompts")) {
                let Some(prompt) = parse_prompt(&file, &json) else {
                    continue;
                };
                let key = prompt.language.to_lowercase();
                if prompts.contains_key(&key) {
                    info!(language = %key, "user prompt template overrides bundled prompt");
                }
                prompts.insert(key, prompt);
            }
        }

        if loaded == 0 {
            warn!("no templates found, adding default templates");
            for lang in SUPPORTED_LANGUAGES {
                let name = format!("{}-default", lang);
                templates.insert(
                    name.clone(),
                    ProjectTemplate::empty(name, *lang, format!("Default {} application", lang)),
                );
            }
        }

        templates
            .entry(DEFAULT_NAME.to_string())
            .or_insert_with(|| {
                ProjectTemplate::empty(DEFAULT_NAME, "", "Default generic application")
            });

        prompts
            .entry(DEFAULT_NAME.to_string())
            .or_insert_with(|| bundled::generic_prompt().clone());

        debug!(
            templates = templates.len(),
            prompts = prompts.len(),
            "template store ready"
        );

        Self { templates, prompts }
    }

    /// Look up a project template by name.
    pub fn resolve(&self, name: &str) -> Result<&ProjectTemplate> {
        self.templates
            .get(name)
            .ok_or_else(|| ScaffoldError::TemplateNotFound {
                name: name.to_string(),
                available: self
                    .templates
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Look up the prompt template for `language`, falling back to `default`.
    ///
    /// Matching is case-insensitive. The fallback is logged, never an error.
    pub fn resolve_prompt(&self, language: &str) -> &PromptTemplate {
        let key = language.to_lowercase();
        if let Some(prompt) = self.prompts.get(&key) {
            return prompt;
        }

        warn!(language, "no prompt template for language, using default");
        self.prompts
            .get(DEFAULT_NAME)
            .unwrap_or_else(|| bundled::generic_prompt())
    }

    /// All project templates, sorted by name.
    pub fn templates(&self) -> impl Iterator<Item = &ProjectTemplate> {
        self.templates.values()
    }

    /// Distinct languages with a prompt template, sorted.
    pub fn languages(&self) -> Vec<&str> {
        self.prompts
            .values()
            .map(|p| p.language.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn parse_project(file: &str, json: &str) -> Option<ProjectTemplate> {
    let tmpl: ProjectTemplate = parse_json(file, json)?;
    if tmpl.name.trim().is_empty() {
        warn!(file, "template has no name, skipping");
        return None;
    }
    Some(tmpl)
}

fn parse_prompt(file: &str, json: &str) -> Option<PromptTemplate> {
    let prompt: PromptTemplate = parse_json(file, json)?;
    if prompt.language.trim().is_empty() {
        warn!(file, "prompt template has no language, skipping");
        return None;
    }
    Some(prompt)
}

fn parse_json<T: DeserializeOwned>(file: &str, json: &str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(file, error = %e, "invalid template format");
            None
        }
    }
}

/// Read every `*.json` file directly inside `dir`, sorted by file name.
///
/// A missing directory yields nothing. Unreadable entries are skipped with a
/// warning.
fn read_json_dir(dir: &Path) -> Vec<(String, String)> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "could not read template directory");
            return Vec::new();
        }
    };

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .filter_map(|path| {
            let file = path.display().to_string();
            match std::fs::read_to_string(&path) {
                Ok(json) => Some((file, json)),
                Err(e) => {
                    warn!(file, error = %e, "could not read template file");
                    None
                }
            }
        })
        .collect()
}
