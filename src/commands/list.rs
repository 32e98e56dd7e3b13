//! Implementation of the `scaffold templates` and `scaffold languages`
//! commands.

use super::load_store;
use crate::cli::ListArgs;
use crate::error::{Result, ScaffoldError};
use crate::template::TemplateStore;
use serde::Serialize;

#[derive(Serialize)]
struct TemplateRow<'a> {
    name: &'a str,
    language: &'a str,
    description: &'a str,
    files: usize,
}

/// Execute the `scaffold templates` command.
pub fn cmd_templates(args: ListArgs) -> Result<()> {
    let store = load_store(&args.templates)?;
    println!("{}", format_templates(&store, args.json)?);
    Ok(())
}

/// Execute the `scaffold languages` command.
pub fn cmd_languages(args: ListArgs) -> Result<()> {
    let store = load_store(&args.templates)?;
    println!("{}", format_languages(&store, args.json)?);
    Ok(())
}

fn format_templates(store: &TemplateStore, json: bool) -> Result<String> {
    let rows: Vec<_> = store
        .templates()
        .map(|t| TemplateRow {
            name: &t.name,
            language: &t.language,
            description: &t.description,
            files: t.files.len(),
        })
        .collect();

    if json {
        return to_json(&rows);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<20} {:<12} {:>5}  {}\n",
        "NAME", "LANGUAGE", "FILES", "DESCRIPTION"
    ));
    for row in &rows {
        let language = if row.language.is_empty() {
            "-"
        } else {
            row.language
        };
        out.push_str(&format!(
            "{:<20} {:<12} {:>5}  {}\n",
            row.name, language, row.files, row.description
        ));
    }
    Ok(out.trim_end().to_string())
}

fn format_languages(store: &TemplateStore, json: bool) -> Result<String> {
    let languages = store.languages();
    if json {
        return to_json(&languages);
    }
    Ok(languages.join("\n"))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ScaffoldError::UserError(format!("failed to serialize listing: {}", e)))
}
