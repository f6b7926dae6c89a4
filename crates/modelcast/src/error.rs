use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::value::Value;

/// A single value could not be coerced into the type its attribute declares.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CastError {
    message: String,
}

impl CastError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The standard failure for `value` not being castable to `type_name`.
    pub fn invalid(value: &Value, type_name: impl fmt::Display) -> Self {
        Self::new(format!(
            "Invalid cast: {} -> {}",
            value.quoted(),
            type_name
        ))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failures of several attributes (or of nested models), keyed by path.
///
/// Paths are dotted: `birthday.day`, `addresses.1.number`.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("Errors:\n{}", render_entries(.errors))]
pub struct CompoundError {
    errors: IndexMap<String, Vec<String>>,
}

impl CompoundError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one message under `path`.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(path.into())
            .or_default()
            .push(message.into());
    }

    /// Merge `other` into this error, prefixing each of its paths with `"{prefix}."`.
    pub fn merge_prefixed(&mut self, prefix: &str, other: CompoundError) {
        for (path, messages) in other.errors {
            self.errors
                .entry(format!("{prefix}.{path}"))
                .or_default()
                .extend(messages);
        }
    }

    /// Fold a resolution failure for `path` into this error.
    ///
    /// Cast and compound failures are collected; anything else is handed back
    /// to the caller untouched.
    pub(crate) fn collect(&mut self, path: &str, error: ModelError) -> Result<()> {
        match error {
            ModelError::Cast(cast) => {
                self.add(path, cast.message);
                Ok(())
            }
            ModelError::Compound(compound) => {
                self.merge_prefixed(path, compound);
                Ok(())
            }
            other => Err(other),
        }
    }

    pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
        &self.errors
    }

    /// Messages recorded for one path, if any.
    pub fn messages(&self, path: &str) -> Option<&[String]> {
        self.errors.get(path).map(Vec::as_slice)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.errors
    }

    /// `Ok(())` when nothing was collected, otherwise this error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Compound(self))
        }
    }
}

impl FromIterator<(String, Vec<String>)> for CompoundError {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

fn render_entries(errors: &IndexMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .map(|(path, messages)| format!("  {}: {}", path, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid attributes: {}", .0.join(", "))]
    InvalidAttributes(Vec<String>),

    #[error("Not assigned attribute {0}")]
    NotAssignedAttribute(String),

    #[error(transparent)]
    Cast(#[from] CastError),

    #[error(transparent)]
    Compound(#[from] CompoundError),

    #[error("Attribute {0} already exists")]
    DuplicateAttribute(String),

    /// A computed default read its own attribute, directly or through others.
    #[error("Cyclic default for attribute {0}")]
    CyclicDefault(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while loading model definition files.
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown type '{expr}' for {model}.{attribute}")]
    UnknownType {
        model: String,
        attribute: String,
        expr: String,
    },

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Model {0} already defined")]
    DuplicateModel(String),

    #[error("Default given for undeclared attribute {model}.{attribute}")]
    UnknownDefault { model: String, attribute: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cast_error_quotes_strings() {
        let error = CastError::invalid(&Value::from("x"), "Boolean");
        assert_eq!(error.message(), "Invalid cast: 'x' -> Boolean");
    }

    #[test]
    fn cast_error_renders_other_values_plainly() {
        let error = CastError::invalid(&Value::Bool(true), "Integer");
        assert_eq!(error.to_string(), "Invalid cast: true -> Integer");
    }

    #[test]
    fn compound_accumulates_messages_per_path() {
        let mut errors = CompoundError::new();
        errors.add("x", "first");
        errors.add("x", "second");
        errors.add("y", "third");

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.messages("x"),
            Some(&["first".to_string(), "second".to_string()][..])
        );
    }

    #[test]
    fn merge_prefixed_rekeys_paths() {
        let mut nested = CompoundError::new();
        nested.add("max", "Invalid cast: true -> Integer");

        let mut errors = CompoundError::new();
        errors.merge_prefixed("range", nested);

        assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["range.max"]);
    }

    #[test]
    fn collect_passes_through_other_errors() {
        let mut errors = CompoundError::new();
        let outcome = errors.collect("x", ModelError::NotAssignedAttribute("x".into()));

        assert_eq!(outcome, Err(ModelError::NotAssignedAttribute("x".into())));
        assert!(errors.is_empty());
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ModelError::InvalidAttributes(vec!["z".into(), "w".into()]).to_string(),
            "Invalid attributes: z, w"
        );
        assert_eq!(
            ModelError::NotAssignedAttribute("y".into()).to_string(),
            "Not assigned attribute y"
        );
        assert_eq!(
            ModelError::DuplicateAttribute("x".into()).to_string(),
            "Attribute x already exists"
        );
        assert_eq!(
            ModelError::CyclicDefault("a".into()).to_string(),
            "Cyclic default for attribute a"
        );
    }

    #[test]
    fn compound_display_lists_every_path() {
        let mut errors = CompoundError::new();
        errors.add("a", "bad");
        errors.add("b.c", "worse");

        assert_eq!(errors.to_string(), "Errors:\n  a: bad\n  b.c: worse");
    }
}
