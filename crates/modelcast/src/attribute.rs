//! Attribute descriptors.
//!
//! An [`Attribute`] is one named slot of a model class: its name, the type
//! that governs casting (if any), and options such as a default. Attributes
//! are built once while a class is declared and never change afterwards.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::Result;
use crate::instance::ModelInstance;
use crate::types::TypeDescriptor;
use crate::value::Value;

/// Function computing a default from the instance being resolved.
pub type ComputedDefault = Arc<dyn Fn(&ModelInstance) -> Result<Value> + Send + Sync>;

/// A default used when the raw input carries no value for the attribute.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    /// Receives the instance, so it may read other attributes.
    Computed(ComputedDefault),
}

impl DefaultValue {
    pub fn computed<F>(func: F) -> Self
    where
        F: Fn(&ModelInstance) -> Result<Value> + Send + Sync + 'static,
    {
        DefaultValue::Computed(Arc::new(func))
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, DefaultValue::Computed(_))
    }

    /// The raw (not yet cast) default for `instance`.
    pub fn evaluate(&self, instance: &ModelInstance) -> Result<Value> {
        match self {
            DefaultValue::Literal(value) => Ok(value.clone()),
            DefaultValue::Computed(func) => func(instance),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultValue::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Declaration options of an attribute.
///
/// `extra` holds free-form options that the engine ignores but schema
/// documents report (e.g. `description`).
#[derive(Debug, Clone, Default)]
pub struct AttributeOptions {
    pub default: Option<DefaultValue>,
    pub extra: IndexMap<String, serde_json::Value>,
}

impl AttributeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a literal default.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Set a default computed from the instance.
    pub fn with_computed_default<F>(mut self, func: F) -> Self
    where
        F: Fn(&ModelInstance) -> Result<Value> + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::computed(func));
        self
    }

    /// Attach a free-form option.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.extra.is_empty()
    }
}

/// A named, optionally typed slot declared on a model class.
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    type_: Option<TypeDescriptor>,
    options: AttributeOptions,
}

impl Attribute {
    pub fn new(
        name: impl Into<String>,
        type_: Option<TypeDescriptor>,
        options: AttributeOptions,
    ) -> Self {
        Self {
            name: name.into(),
            type_,
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type; `None` keeps raw values unchanged.
    pub fn type_descriptor(&self) -> Option<&TypeDescriptor> {
        self.type_.as_ref()
    }

    pub fn options(&self) -> &AttributeOptions {
        &self.options
    }

    pub fn has_default(&self) -> bool {
        self.options.default.is_some()
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.options.default.as_ref()
    }

    pub fn option(&self, name: &str) -> Option<&serde_json::Value> {
        self.options.extra.get(name)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attribute[name: {}", self.name)?;
        if let Some(type_) = &self.type_ {
            write!(f, ", type: {type_}")?;
        }
        match &self.options.default {
            Some(DefaultValue::Literal(value)) => write!(f, ", default: {}", value.inspect())?,
            Some(DefaultValue::Computed(_)) => f.write_str(", default: <computed>")?,
            None => {}
        }
        f.write_str("]")
    }
}
