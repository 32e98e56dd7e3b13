//! Tests for template store loading and resolution.

use super::bundled;
use super::store::TemplateStore;
use super::types::PromptTemplate;
use crate::error::ScaffoldError;
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

const GO_API: &str = r#"{
  "name": "go-api",
  "description": "bundled go api",
  "language": "go",
  "prompt": "bundled prompt",
  "files": { "go.mod": "module {{ .Package }}\n" }
}"#;

fn prompt(language: &str, body: &str) -> PromptTemplate {
    PromptTemplate {
        language: language.to_string(),
        description: String::new(),
        template: body.to_string(),
    }
}

fn prompts(entries: &[(&str, &str)]) -> BTreeMap<String, PromptTemplate> {
    entries
        .iter()
        .map(|(lang, body)| (lang.to_string(), prompt(lang, body)))
        .collect()
}

#[test]
fn test_bundled_store_resolves_default() {
    let store = TemplateStore::load(None);
    let tmpl = store.resolve("default").unwrap();
    assert_eq!(tmpl.name, "default");
    assert!(tmpl.files.is_empty());
}

#[test]
fn test_bundled_store_lists_templates_sorted() {
    let store = TemplateStore::load(None);
    let names: Vec<_> = store.templates().map(|t| t.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(names.contains(&"go-api"));
    assert!(names.contains(&"python-flask"));
}

#[test]
fn test_resolve_unknown_template_is_not_found() {
    let store = TemplateStore::load(None);
    let err = store.resolve("cobol-mainframe").unwrap_err();
    match err {
        ScaffoldError::TemplateNotFound { name, available } => {
            assert_eq!(name, "cobol-mainframe");
            assert!(available.contains("default"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_user_override_replaces_bundled_template() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("go-api.json"),
        r#"{"name": "go-api", "language": "go", "prompt": "override prompt",
            "files": {"main.go": "package main\n"}}"#,
    )
    .unwrap();

    let store = TemplateStore::from_sources(
        &[("go-api.json", GO_API)],
        &prompts(&[("default", "d")]),
        Some(dir.path()),
    );

    let tmpl = store.resolve("go-api").unwrap();
    assert_eq!(tmpl.prompt, "override prompt");
    assert!(tmpl.files.contains_key("main.go"));
    assert!(!tmpl.files.contains_key("go.mod"));
}

#[test]
fn test_user_templates_add_new_names() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("rust-cli.json"),
        r#"{"name": "rust-cli", "language": "rust"}"#,
    )
    .unwrap();

    let store = TemplateStore::from_sources(
        &[("go-api.json", GO_API)],
        &prompts(&[("default", "d")]),
        Some(dir.path()),
    );

    assert!(store.resolve("go-api").is_ok());
    assert_eq!(store.resolve("rust-cli").unwrap().language, "rust");
}

#[test]
fn test_invalid_override_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("nameless.json"), r#"{"name": ""}"#).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let store = TemplateStore::from_sources(
        &[("go-api.json", GO_API)],
        &prompts(&[("default", "d")]),
        Some(dir.path()),
    );

    let names: Vec<_> = store.templates().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec!["default".to_string(), "go-api".to_string()]);
}

#[test]
fn test_missing_override_dir_is_ignored() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");

    let store = TemplateStore::from_sources(
        &[("go-api.json", GO_API)],
        &prompts(&[("default", "d")]),
        Some(&missing),
    );
    assert!(store.resolve("go-api").is_ok());
}

#[test]
fn test_zero_templates_synthesizes_defaults() {
    let store = TemplateStore::from_sources(&[], &prompts(&[("default", "d")]), None);

    for name in ["default", "go-default", "python-default", "javascript-default", "java-default"] {
        assert!(store.resolve(name).is_ok(), "missing synthesized {}", name);
    }
    assert_eq!(store.resolve("python-default").unwrap().language, "python");
}

#[test]
fn test_default_always_resolves_even_when_bundled_lacks_it() {
    let store = TemplateStore::from_sources(
        &[("go-api.json", GO_API)],
        &prompts(&[("go", "g")]),
        None,
    );
    assert!(store.resolve("default").is_ok());
    // Templates loaded, so no per-language synthesis.
    assert!(store.resolve("go-default").is_err());
}

#[test]
fn test_prompt_fallback_to_default() {
    let store = TemplateStore::from_sources(
        &[],
        &prompts(&[("default", "generic body"), ("go", "go body")]),
        None,
    );

    assert_eq!(store.resolve_prompt("go").template, "go body");
    assert_eq!(store.resolve_prompt("haskell").template, "generic body");
}

#[test]
fn test_prompt_lookup_is_case_insensitive() {
    let store = TemplateStore::from_sources(&[], &prompts(&[("python", "py body")]), None);
    assert_eq!(store.resolve_prompt("Python").template, "py body");
}

#[test]
fn test_prompt_fallback_without_registered_default() {
    let store = TemplateStore::from_sources(&[], &BTreeMap::new(), None);
    let prompt = store.resolve_prompt("go");
    assert_eq!(prompt.template, bundled::generic_prompt().template);
}

#[test]
fn test_user_prompt_overrides_bundled() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("prompts")).unwrap();
    fs::write(
        dir.path().join("prompts").join("go.json"),
        r#"{"language": "Go", "template": "custom go prompt"}"#,
    )
    .unwrap();

    let store = TemplateStore::from_sources(
        &[],
        &prompts(&[("default", "d"), ("go", "bundled go")]),
        Some(dir.path()),
    );

    assert_eq!(store.resolve_prompt("go").template, "custom go prompt");
}

#[test]
fn test_languages_lists_prompt_languages() {
    let store = TemplateStore::from_sources(
        &[],
        &prompts(&[("default", "d"), ("go", "g"), ("java", "j")]),
        None,
    );
    assert_eq!(store.languages(), vec!["default", "go", "java"]);
}
