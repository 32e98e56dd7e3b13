//! Implementation of the `scaffold generate` command.

use super::current_dir;
use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::dispatch::{Engine, EngineOptions, RunReport};
use crate::error::{Result, ScaffoldError};
use crate::generator::{GenerationRequest, GenerationSummary, Generator};
use crate::progress::{ChannelNotifier, EventKind, EventLog, Fanout, Notifier, ProgressEvent};
use crate::query::CodeQuery;
use crate::query::openai::{ChatClient, ClientSettings};
use crate::template::TemplateStore;
use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

/// Pending progress events buffered for the console printer.
const PROGRESS_BUFFER: usize = 1024;

/// Execute the `scaffold generate` command.
///
/// Resolves config (file, then flags), builds the model client, and runs
/// one generation.
pub fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let config = Config::discover(args.templates.config.as_deref(), &current_dir()?)?
        .with_overrides(args.overrides())?;
    let api_key =
        config.resolve_api_key(args.api_key.as_deref(), |name| std::env::var(name).ok())?;
    let client = ChatClient::new(ClientSettings::new(
        api_key,
        config.api_url.as_str(),
        config.model.as_str(),
        config.timeout(),
    ))?;
    info!(model = client.model(), format = ?client.format(), "model client ready");

    let (summary, report) = run_generation(&config, &args.prompt_text(), &client)?;

    println!();
    println!(
        "Template '{}' ({}): {} skeleton file(s), {} generated file(s)",
        summary.template,
        summary.language,
        summary.skeleton_files,
        summary.extracted_files
    );
    println!(
        "{} written, {} failed, {} skipped",
        report.written, report.failed, report.skipped
    );
    println!("Finished writing project to {}", config.output_dir.display());
    Ok(())
}

/// Run one generation with `config` against `query`, printing per-file
/// progress as it happens.
///
/// Writes are drained before returning, including when generation fails
/// after skeleton files were queued.
pub fn run_generation(
    config: &Config,
    prompt: &str,
    query: &dyn CodeQuery,
) -> Result<(GenerationSummary, RunReport)> {
    match config.to_yaml() {
        Ok(yaml) => debug!("effective config:\n{}", yaml),
        Err(e) => debug!(error = %e, "could not render effective config"),
    }
    let store = TemplateStore::load(Some(&config.templates_dir));

    let (channel, events) = ChannelNotifier::new(PROGRESS_BUFFER);
    let channel = Arc::new(channel);
    let mut fanout = Fanout::new().with(channel.clone());
    if let Some(path) = &config.event_log {
        let log = EventLog::open(path).map_err(|e| {
            ScaffoldError::UserError(format!(
                "failed to open event log '{}': {}",
                path.display(),
                e
            ))
        })?;
        fanout = fanout.with(Arc::new(log));
    }
    let notifier: Arc<dyn Notifier> = Arc::new(fanout);

    let printer = thread::Builder::new()
        .name("progress".to_string())
        .spawn(move || print_progress(events))
        .map_err(|e| ScaffoldError::UserError(format!("failed to spawn progress printer: {}", e)))?;

    let engine = Engine::new(
        EngineOptions::new(&config.output_dir)
            .with_workers(config.worker_count)
            .with_queue_capacity(config.queue_capacity),
        Arc::clone(&notifier),
    );
    let generator = Generator::new(&store, engine, Arc::clone(&notifier));
    let request = GenerationRequest {
        prompt: prompt.to_string(),
        template: config.template.clone(),
        language: config.language.clone(),
        base_package: config.base_package.clone(),
    };

    let outcome = generator.generate(&request, query);
    let report = generator.finish();

    if channel.dropped() > 0 {
        debug!(dropped = channel.dropped(), "progress events dropped by console printer");
    }
    // The printer exits once every sender is gone.
    drop(notifier);
    drop(channel);
    if printer.join().is_err() {
        debug!("progress printer panicked");
    }

    Ok((outcome?, report))
}

fn print_progress(events: Receiver<ProgressEvent>) {
    for event in events {
        let path = event.path.as_deref().unwrap_or("");
        match event.kind {
            EventKind::Written => println!("  wrote    {}", path),
            EventKind::Skipped => println!("  skipped  {} (already written)", path),
            EventKind::Failed => println!("  failed   {}: {}", path, event.message),
            EventKind::RunErrored => println!("  error    {}", event.message),
            EventKind::RunStarted
            | EventKind::Enqueued
            | EventKind::RunCompleted => {}
        }
    }
}
