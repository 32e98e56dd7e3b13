//! Template engine for variable substitution.
//!
//! This module performs `{{ Name }}` substitution in skeleton files and system
//! prompts. Single braces are ordinary text, so source code with blocks and
//! object literals passes through untouched.
//!
//! # Syntax
//!
//! - `{{ Name }}` - Substitutes the value of variable `Name`
//! - `{{ .Name }}` - Same; the leading dot is accepted and ignored
//!
//! # Error Handling
//!
//! Undefined variables are an authoring error in the template, so they fail the
//! render instead of expanding to an empty string. Every error carries the name
//! of the template that produced it.

use std::collections::HashMap;
use thiserror::Error;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Error type for template rendering failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A variable was referenced but not provided.
    #[error("undefined variable '{name}' at position {position} in template '{template}'")]
    UndefinedVariable {
        /// Name of the template being rendered.
        template: String,
        /// The name of the undefined variable.
        name: String,
        /// Byte offset of the opening delimiter.
        position: usize,
    },
    /// A `{{` was found without a matching `}}`.
    #[error("unclosed '{{{{' at position {position} in template '{template}'")]
    Unclosed {
        /// Name of the template being rendered.
        template: String,
        /// Byte offset of the unclosed delimiter.
        position: usize,
    },
    /// An empty variable name was found (e.g., `{{ }}`).
    #[error("empty variable name at position {position} in template '{template}'")]
    EmptyVariableName {
        /// Name of the template being rendered.
        template: String,
        /// Byte offset of the empty placeholder.
        position: usize,
    },
}

/// Render a template string by substituting variables.
///
/// `name` identifies the template in error messages (a skeleton file path or
/// `prompt:<language>`).
///
/// # Examples
///
/// ```
/// use scaffold_agent::template::{render, vars};
///
/// let vars = vars([("Package", "github.com/acme/shop")]);
/// let out = render("go.mod", "module {{ .Package }}\n", &vars).unwrap();
/// assert_eq!(out, "module github.com/acme/shop\n");
/// ```
pub fn render(
    name: &str,
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        result.push_str(&rest[..start]);
        let position = offset + start;
        let after_open = &rest[start + OPEN.len()..];

        let Some(end) = after_open.find(CLOSE) else {
            return Err(TemplateError::Unclosed {
                template: name.to_string(),
                position,
            });
        };

        let var_name = after_open[..end].trim();
        let var_name = var_name.strip_prefix('.').unwrap_or(var_name).trim();

        if var_name.is_empty() {
            return Err(TemplateError::EmptyVariableName {
                template: name.to_string(),
                position,
            });
        }

        match variables.get(var_name) {
            Some(value) => result.push_str(value),
            None => {
                return Err(TemplateError::UndefinedVariable {
                    template: name.to_string(),
                    name: var_name.to_string(),
                    position,
                });
            }
        }

        let consumed = start + OPEN.len() + end + CLOSE.len();
        offset += consumed;
        rest = &rest[consumed..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Helper to create a variables map from a list of key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
