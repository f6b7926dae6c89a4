//! # Definition Files
//!
//! Model classes declared as data, in TOML or JSON:
//!
//! ```toml
//! [[model]]
//! name = "Birthday"
//! attributes = { day = "integer", month = "integer", year = "integer" }
//!
//! [[model]]
//! name = "Contact"
//! [model.attributes]
//! name = "string"
//! birthday = "model[Birthday]"
//! phones = "hash[symbol, integer]"
//! [model.defaults]
//! name = "Anonymous"
//! ```
//!
//! `attributes` is either a table of name to type expression or a plain list
//! of names (untyped). `extends` names an earlier model to inherit from.
//!
//! ## Type expressions
//!
//! | Expression | Type |
//! |------------|------|
//! | `any` | no cast |
//! | `string`, `integer`, `float`, `boolean`, `symbol`, `regexp` | scalars |
//! | `time` / `time[FMT]` | time with the configured or given format |
//! | `enum[a, b]` | enumeration |
//! | `array[T]` | array of `T` |
//! | `hash[K, V]` | hash from `K` to `V` |
//! | `model[Name]` | a model defined earlier |

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::attribute::AttributeOptions;
use crate::class::ModelClass;
use crate::error::DefinitionError;
use crate::types::{self, TypeDescriptor};
use crate::value::Value;

pub const DEFAULT_TIME_FORMAT: &str = "%FT%T%:z";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefinitionFile {
    #[serde(default, rename = "model")]
    pub models: Vec<ModelDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelDefinition {
    pub name: String,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub attributes: AttributeList,
    #[serde(default)]
    pub defaults: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttributeList {
    Names(Vec<String>),
    Typed(IndexMap<String, String>),
}

impl Default for AttributeList {
    fn default() -> Self {
        AttributeList::Names(Vec::new())
    }
}

impl AttributeList {
    /// `(name, type expression)` pairs in declaration order.
    pub fn entries(&self) -> Vec<(&str, Option<&str>)> {
        match self {
            AttributeList::Names(names) => names.iter().map(|name| (name.as_str(), None)).collect(),
            AttributeList::Typed(typed) => typed
                .iter()
                .map(|(name, expr)| (name.as_str(), Some(expr.as_str())))
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            AttributeList::Names(names) => names.iter().any(|declared| declared == name),
            AttributeList::Typed(typed) => typed.contains_key(name),
        }
    }
}

/// Classes built from definitions, by name, in definition order.
#[derive(Debug, Clone)]
pub struct DefinitionSet {
    time_format: String,
    models: IndexMap<String, ModelClass>,
}

impl Default for DefinitionSet {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            models: IndexMap::new(),
        }
    }

    /// Format used for bare `time` expressions.
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let mut set = Self::new();
        set.extend_from_path(path)?;
        Ok(set)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, DefinitionError> {
        let mut set = Self::new();
        set.extend_from_toml(text)?;
        Ok(set)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DefinitionError> {
        let mut set = Self::new();
        set.extend_from_json(text)?;
        Ok(set)
    }

    /// Read a `.json` file as JSON, anything else as TOML.
    pub fn extend_from_path(&mut self, path: &Path) -> Result<(), DefinitionError> {
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading model definitions");
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => self.extend_from_json(&text),
            _ => self.extend_from_toml(&text),
        }
    }

    pub fn extend_from_toml(&mut self, text: &str) -> Result<(), DefinitionError> {
        let file: DefinitionFile = toml::from_str(text)?;
        self.extend(&file)
    }

    pub fn extend_from_json(&mut self, text: &str) -> Result<(), DefinitionError> {
        let file: DefinitionFile = serde_json::from_str(text)?;
        self.extend(&file)
    }

    pub fn extend(&mut self, file: &DefinitionFile) -> Result<(), DefinitionError> {
        for definition in &file.models {
            self.define(definition)?;
        }
        Ok(())
    }

    /// Build and register one class.
    pub fn define(&mut self, definition: &ModelDefinition) -> Result<&ModelClass, DefinitionError> {
        let name = &definition.name;
        if self.models.contains_key(name) {
            return Err(DefinitionError::DuplicateModel(name.clone()));
        }
        if let Some(attribute) = definition
            .defaults
            .keys()
            .find(|attribute| !definition.attributes.contains(attribute))
        {
            return Err(DefinitionError::UnknownDefault {
                model: name.clone(),
                attribute: attribute.clone(),
            });
        }

        let mut builder = match &definition.extends {
            Some(parent) => {
                let parent = self
                    .models
                    .get(parent)
                    .ok_or_else(|| DefinitionError::UnknownModel(parent.clone()))?;
                ModelClass::extend(parent, name.clone())
            }
            None => ModelClass::builder(name.clone()),
        };

        for (attribute, expr) in definition.attributes.entries() {
            let type_ = match expr.map(str::trim) {
                None | Some("any") => None,
                Some(expr) => Some(self.parse_type(expr).ok_or_else(|| {
                    DefinitionError::UnknownType {
                        model: name.clone(),
                        attribute: attribute.to_string(),
                        expr: expr.to_string(),
                    }
                })?),
            };
            let mut options = AttributeOptions::new();
            if let Some(default) = definition.defaults.get(attribute) {
                options = options.with_default(default.clone());
            }
            builder = builder.declare(attribute, type_, options)?;
        }

        let class = builder.build();
        debug!(model = %name, attributes = class.len(), "defined model");
        let (index, _) = self.models.insert_full(name.clone(), class);
        Ok(&self.models[index])
    }

    /// Parse a type expression against the models defined so far.
    pub fn parse_type(&self, expr: &str) -> Option<TypeDescriptor> {
        let expr = expr.trim();
        let (head, args) = match expr.find('[') {
            Some(open) if expr.ends_with(']') => (&expr[..open], Some(&expr[open + 1..expr.len() - 1])),
            Some(_) => return None,
            None => (expr, None),
        };

        match (head.trim().to_ascii_lowercase().as_str(), args) {
            ("string", None) => Some(types::string()),
            ("integer", None) => Some(types::integer()),
            ("float", None) => Some(types::float()),
            ("boolean", None) => Some(types::boolean()),
            ("symbol", None) => Some(types::symbol()),
            ("regexp", None) => Some(types::regexp()),
            ("time", None) => Some(types::time(self.time_format.clone())),
            ("time", Some(format)) => Some(types::time(format.trim())),
            ("enum", Some(values)) => Some(types::enumeration(
                split_top_level(values).into_iter().map(str::trim),
            )),
            ("array", Some(item)) => self.parse_type(item).map(types::array),
            ("hash", Some(inner)) => match split_top_level(inner).as_slice() {
                [key, value] => Some(types::hash(self.parse_type(key)?, self.parse_type(value)?)),
                _ => None,
            },
            ("model", Some(model)) => self.models.get(model.trim()).map(types::model),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ModelClass> {
        self.models.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ModelClass> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Split on commas that are not nested inside brackets.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
