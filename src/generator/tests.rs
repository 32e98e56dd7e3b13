//! Tests for the generation pipeline.

use super::*;
use crate::dispatch::{EngineOptions, EngineState};
use crate::query::QueryError;
use crate::template::PromptTemplate;
use crate::test_support::{RecordingNotifier, StubQuery};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const GO_API: &str = r#"{
  "name": "go-api",
  "description": "go api",
  "language": "go",
  "prompt": "Use net/http only.",
  "files": {
    "go.mod": "module {{ .Package }}\n",
    "notes.txt": "left as is: {{ Missing }}"
  }
}"#;

const BROKEN_PROMPT: &str = r#"{ "name": "broken", "language": "klingon" }"#;

const REPLY: &str = "Here is your project.\n\n\
---FILE_PATH: go.mod\n```\nmodule from/the/model\n```\n---END_FILE\n\n\
---FILE_PATH: internal/handlers/handlers.go\n```go\npackage handlers\n```\n---END_FILE\n";

fn store() -> TemplateStore {
    let prompts: BTreeMap<String, PromptTemplate> = [
        ("go", "Go code for {{ .BasePackage }}. {{ .ExtraPrompt }}"),
        ("python", "Python code for {{ .BasePackage }}.{{ .ExtraPrompt }}"),
        ("default", "Any code.{{ .ExtraPrompt }}"),
        ("klingon", "{{ .Undefined }}"),
    ]
    .into_iter()
    .map(|(language, template)| {
        (
            language.to_string(),
            PromptTemplate {
                language: language.to_string(),
                description: String::new(),
                template: template.to_string(),
            },
        )
    })
    .collect();

    TemplateStore::from_sources(
        &[("go-api.json", GO_API), ("broken.json", BROKEN_PROMPT)],
        &prompts,
        None,
    )
}

fn request(template: &str, language: &str) -> GenerationRequest {
    GenerationRequest {
        prompt: "a todo service".to_string(),
        template: template.to_string(),
        language: language.to_string(),
        base_package: "example.com/todo".to_string(),
    }
}

fn generator<'a>(
    store: &'a TemplateStore,
    root: &Path,
    recorder: &Arc<RecordingNotifier>,
) -> Generator<'a> {
    let notifier: Arc<dyn Notifier> = recorder.clone();
    // One worker takes tasks in submission order.
    let engine = Engine::new(EngineOptions::new(root).with_workers(1), Arc::clone(&notifier));
    Generator::new(store, engine, notifier)
}

#[test]
fn test_full_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let store = store();
    let recorder = Arc::new(RecordingNotifier::new());
    let query = StubQuery::replying(REPLY);
    let generator = generator(&store, temp_dir.path(), &recorder);

    let summary = generator.generate(&request("go-api", "go"), &query).unwrap();
    assert_eq!(
        summary,
        GenerationSummary {
            template: "go-api".to_string(),
            language: "go".to_string(),
            skeleton_files: 2,
            extracted_files: 2,
        }
    );

    let report = generator.finish();
    assert_eq!(report.written, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);

    let root = temp_dir.path();
    // Skeleton was queued first, so its go.mod wins.
    assert_eq!(
        fs::read_to_string(root.join("go.mod")).unwrap(),
        "module example.com/todo\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("notes.txt")).unwrap(),
        "left as is: {{ Missing }}"
    );
    assert_eq!(
        fs::read_to_string(root.join("internal/handlers/handlers.go")).unwrap(),
        "package handlers"
    );

    let calls = query.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "Go code for example.com/todo. Use net/http only.");
    assert_eq!(calls[0].1, "a todo service");

    let kinds = recorder.kinds();
    assert_eq!(kinds.first(), Some(&EventKind::RunStarted));
    assert_eq!(kinds.last(), Some(&EventKind::RunCompleted));
}

#[test]
fn test_query_failure_is_fatal_and_skips_parsing() {
    let temp_dir = TempDir::new().unwrap();
    let store = store();
    let recorder = Arc::new(RecordingNotifier::new());
    let query = StubQuery::failing(QueryError::Transport("connection refused".to_string()));
    let generator = generator(&store, temp_dir.path(), &recorder);

    let err = generator
        .generate(&request("go-api", "go"), &query)
        .unwrap_err();
    assert!(matches!(err, ScaffoldError::Query(QueryError::Transport(_))));
    assert_eq!(recorder.count(EventKind::RunErrored), 1);

    // Skeleton files queued before the query still drain.
    let report = generator.finish();
    assert_eq!(report.written, 2);
    assert!(!temp_dir.path().join("internal").exists());
}

#[test]
fn test_unknown_template_enqueues_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let store = store();
    let recorder = Arc::new(RecordingNotifier::new());
    let query = StubQuery::replying(REPLY);
    let generator = generator(&store, temp_dir.path(), &recorder);

    let err = generator
        .generate(&request("rails", "ruby"), &query)
        .unwrap_err();
    assert!(matches!(err, ScaffoldError::TemplateNotFound { .. }));
    assert_eq!(generator.engine().state(), EngineState::Created);
    assert_eq!(recorder.count(EventKind::Enqueued), 0);
    assert!(query.calls().is_empty());

    assert_eq!(generator.finish().submitted, 0);
}

#[test]
fn test_reply_without_blocks_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = store();
    let recorder = Arc::new(RecordingNotifier::new());
    let query = StubQuery::replying("Sorry, I can't help with that.");
    let generator = generator(&store, temp_dir.path(), &recorder);

    let summary = generator.generate(&request("default", "go"), &query).unwrap();
    assert_eq!(summary.total_files(), 0);
    assert_eq!(generator.finish().written, 0);
    assert_eq!(recorder.count(EventKind::RunErrored), 0);
}

#[test]
fn test_template_language_overrides_request() {
    let temp_dir = TempDir::new().unwrap();
    let store = store();
    let recorder = Arc::new(RecordingNotifier::new());
    let query = StubQuery::replying("");
    let generator = generator(&store, temp_dir.path(), &recorder);

    let summary = generator
        .generate(&request("go-api", "python"), &query)
        .unwrap();
    assert_eq!(summary.language, "go");
    assert!(query.calls()[0].0.starts_with("Go code"));
}

#[test]
fn test_default_template_uses_requested_language() {
    let temp_dir = TempDir::new().unwrap();
    let store = store();
    let recorder = Arc::new(RecordingNotifier::new());
    let query = StubQuery::replying("");
    let generator = generator(&store, temp_dir.path(), &recorder);

    let summary = generator
        .generate(&request("default", "Python"), &query)
        .unwrap();
    assert_eq!(summary.language, "Python");
    assert_eq!(query.calls()[0].0, "Python code for example.com/todo.");
}

#[test]
fn test_unknown_language_falls_back_to_default_prompt() {
    let temp_dir = TempDir::new().unwrap();
    let store = store();
    let recorder = Arc::new(RecordingNotifier::new());
    let query = StubQuery::replying("");
    let generator = generator(&store, temp_dir.path(), &recorder);

    generator
        .generate(&request("default", "cobol"), &query)
        .unwrap();
    assert_eq!(query.calls()[0].0, "Any code.");
}

#[test]
fn test_prompt_render_error_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let store = store();
    let recorder = Arc::new(RecordingNotifier::new());
    let query = StubQuery::replying(REPLY);
    let generator = generator(&store, temp_dir.path(), &recorder);

    let err = generator
        .generate(&request("broken", "go"), &query)
        .unwrap_err();
    match err {
        ScaffoldError::PromptRender { language, .. } => assert_eq!(language, "klingon"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(query.calls().is_empty());
    assert_eq!(recorder.count(EventKind::RunErrored), 1);
}

#[test]
fn test_empty_prompt_is_a_user_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = store();
    let recorder = Arc::new(RecordingNotifier::new());
    let query = StubQuery::replying(REPLY);
    let generator = generator(&store, temp_dir.path(), &recorder);

    let mut req = request("go-api", "go");
    req.prompt = "   ".to_string();
    let err = generator.generate(&req, &query).unwrap_err();
    assert!(matches!(err, ScaffoldError::UserError(_)));
}

#[test]
fn test_same_request_produces_same_tree_in_fresh_roots() {
    let store = store();
    let mut trees = Vec::new();

    for _ in 0..2 {
        let temp_dir = TempDir::new().unwrap();
        let recorder = Arc::new(RecordingNotifier::new());
        let query = StubQuery::replying(REPLY);
        let generator = generator(&store, temp_dir.path(), &recorder);
        generator.generate(&request("go-api", "go"), &query).unwrap();
        generator.finish();

        let mut files = BTreeMap::new();
        for path in ["go.mod", "notes.txt", "internal/handlers/handlers.go"] {
            files.insert(path, fs::read(temp_dir.path().join(path)).unwrap());
        }
        trees.push(files);
    }

    assert_eq!(trees[0], trees[1]);
}

#[test]
fn test_generate_accepts_an_already_started_engine() {
    let temp_dir = TempDir::new().unwrap();
    let store = store();
    let recorder = Arc::new(RecordingNotifier::new());
    let query = StubQuery::replying(REPLY);
    let generator = generator(&store, temp_dir.path(), &recorder);
    generator.engine().start().unwrap();

    generator.generate(&request("go-api", "go"), &query).unwrap();
    assert_eq!(generator.finish().written, 3);
}
