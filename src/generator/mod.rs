//! Generation pipeline.
//!
//! One [`Generator`] drives one run: it seeds the project skeleton, asks the
//! model for code, and feeds every extracted file to the dispatch engine.
//! Writes proceed in the background; [`Generator::finish`] waits for them.

use crate::dispatch::{Engine, EngineState, FileTask, RunReport};
use crate::error::{Result, ScaffoldError};
use crate::parser;
use crate::progress::{EventKind, Notifier, ProgressEvent};
use crate::query::CodeQuery;
use crate::template::{TemplateStore, render, vars};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[cfg(test)]
mod tests;

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Natural-language description of the project, sent as the user prompt.
    pub prompt: String,
    /// Project template name.
    pub template: String,
    /// Requested language; a template with its own language overrides it.
    pub language: String,
    /// Module or package path substituted into skeletons and the prompt.
    pub base_package: String,
}

/// What a successful `generate` queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub template: String,
    /// Language actually used for the system prompt.
    pub language: String,
    /// Skeleton files submitted.
    pub skeleton_files: usize,
    /// Files extracted from the model reply and submitted.
    pub extracted_files: usize,
}

impl GenerationSummary {
    pub fn total_files(&self) -> usize {
        self.skeleton_files + self.extracted_files
    }
}

/// Orchestrates one generation run over an engine.
pub struct Generator<'a> {
    store: &'a TemplateStore,
    engine: Engine,
    notifier: Arc<dyn Notifier>,
}

impl<'a> Generator<'a> {
    /// `notifier` receives run-level events; the engine carries its own for
    /// per-file events.
    pub fn new(store: &'a TemplateStore, engine: Engine, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            engine,
            notifier,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Queue the skeleton and every file the model returns.
    ///
    /// Starts the engine if the caller has not. Does not wait for writes.
    pub fn generate(
        &self,
        request: &GenerationRequest,
        query: &dyn CodeQuery,
    ) -> Result<GenerationSummary> {
        self.notifier.notify(&ProgressEvent::new(
            EventKind::RunStarted,
            format!("generating with template '{}'", request.template),
        ));

        match self.run(request, query) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                warn!(error = %e, "generation failed");
                self.notifier
                    .notify(&ProgressEvent::new(EventKind::RunErrored, e.to_string()));
                Err(e)
            }
        }
    }

    /// Drain and stop the engine.
    pub fn finish(self) -> RunReport {
        let report = self.engine.stop();
        self.notifier.notify(&ProgressEvent::new(
            EventKind::RunCompleted,
            format!(
                "{} written, {} failed, {} skipped",
                report.written, report.failed, report.skipped
            ),
        ));
        report
    }

    fn run(&self, request: &GenerationRequest, query: &dyn CodeQuery) -> Result<GenerationSummary> {
        if request.prompt.trim().is_empty() {
            return Err(ScaffoldError::UserError("prompt is empty".to_string()));
        }

        let template = self.store.resolve(&request.template)?;
        let language = if template.language.is_empty() {
            request.language.clone()
        } else {
            template.language.clone()
        };

        if self.engine.state() == EngineState::Created {
            self.engine.start()?;
        }

        info!(template = %template.name, language = %language, "generating code");

        let package = vars([("Package", request.base_package.as_str())]);
        for (path, content) in &template.files {
            let rendered = match render(path, content, &package) {
                Ok(rendered) => rendered,
                Err(e) => {
                    warn!(path = %path, error = %e, "could not render skeleton file, using raw content");
                    content.clone()
                }
            };
            debug!(path = %path, "queueing skeleton file");
            self.engine.submit(FileTask::new(path.as_str(), rendered));
        }

        let prompt = self.store.resolve_prompt(&language);
        let system_prompt = render(
            &format!("prompt:{}", prompt.language),
            &prompt.template,
            &vars([
                ("BasePackage", request.base_package.as_str()),
                ("ExtraPrompt", template.prompt.as_str()),
            ]),
        )
        .map_err(|source| ScaffoldError::PromptRender {
            language: language.clone(),
            source,
        })?;

        let started = Instant::now();
        let response = query.query(&system_prompt, &request.prompt)?;
        debug!(
            bytes = response.primary_text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "received model reply"
        );

        let tasks = parser::parse(&response.primary_text);
        if tasks.is_empty() {
            warn!("no file blocks found in model reply");
        }

        let extracted_files = tasks.len();
        for task in tasks {
            self.engine.submit(task);
        }
        info!(
            skeleton = template.files.len(),
            extracted = extracted_files,
            "queued generated files"
        );

        Ok(GenerationSummary {
            template: template.name.clone(),
            language,
            skeleton_files: template.files.len(),
            extracted_files,
        })
    }
}
