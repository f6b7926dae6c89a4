//! Enum, container and nested-model casts.
//!
//! Container casts never stop at the first bad element: every failing
//! element is collected into one `CompoundError`, keyed by its index (arrays)
//! or key (hashes).

use super::{BuiltinType, TypeDescriptor};
use crate::class::ModelClass;
use crate::error::{CastError, CompoundError, ModelError, Result};
use crate::instance::ModelInstance;
use crate::value::{Key, Map, Value};

/// A closed set of allowed text values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    values: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|allowed| allowed == value)
    }

    pub(super) fn cast(&self, raw: Value) -> Result<Value> {
        match raw.as_str() {
            Some(text) if self.contains(text) => Ok(Value::String(text.to_string())),
            _ => Err(CastError::invalid(&raw, format!("Enum[{}]", self.values.join(", "))).into()),
        }
    }
}

pub(super) fn cast_array(
    array_type: &BuiltinType,
    item: &TypeDescriptor,
    owner: Option<&ModelInstance>,
    raw: Value,
) -> Result<Value> {
    let Value::Array(items) = raw else {
        return Err(CastError::invalid(&raw, array_type).into());
    };

    let mut errors = CompoundError::new();
    let mut cast = Vec::with_capacity(items.len());
    for (index, element) in items.into_iter().enumerate() {
        match item.cast_for(owner, element) {
            Ok(value) => cast.push(value),
            Err(error) => errors.collect(&index.to_string(), error)?,
        }
    }

    errors.into_result()?;
    Ok(Value::Array(cast))
}

pub(super) fn cast_hash(
    hash_type: &BuiltinType,
    key_type: &TypeDescriptor,
    value_type: &TypeDescriptor,
    owner: Option<&ModelInstance>,
    raw: Value,
) -> Result<Value> {
    let Value::Map(entries) = raw else {
        return Err(CastError::invalid(&raw, hash_type).into());
    };

    let mut errors = CompoundError::new();
    let mut cast = Map::with_capacity(entries.len());
    for (key, value) in entries {
        let name = key.name().to_string();
        let key = match key_type.cast_for(owner, key_value(key)) {
            Ok(cast_key) => value_key(cast_key),
            Err(error) => {
                errors.collect(&name, error)?;
                continue;
            }
        };
        match value_type.cast_for(owner, value) {
            Ok(value) => {
                cast.insert(key, value);
            }
            Err(error) => errors.collect(&name, error)?,
        }
    }

    errors.into_result()?;
    Ok(Value::Map(cast))
}

/// Maps become new instances of `class`; instances of `class` (or a subclass) pass through.
pub(super) fn cast_model(class: &ModelClass, raw: Value) -> Result<Value> {
    match raw {
        Value::Model(instance) if instance.class().is_a(class) => Ok(Value::Model(instance)),
        Value::Map(map) => match ModelInstance::from_map(class, map) {
            Ok(instance) => Ok(Value::Model(instance)),
            Err(ModelError::InvalidAttributes(names)) => Err(names
                .into_iter()
                .map(|name| (name, vec!["unexpected attribute".to_string()]))
                .collect::<CompoundError>()
                .into()),
            Err(other) => Err(other),
        },
        other => Err(CastError::invalid(&other, format!("Model[{}]", class.schema_name())).into()),
    }
}

fn key_value(key: Key) -> Value {
    match key {
        Key::Ident(name) => Value::Symbol(name),
        Key::Text(name) => Value::String(name),
    }
}

fn value_key(value: Value) -> Key {
    match value {
        Value::Symbol(name) => Key::Ident(name),
        Value::String(name) => Key::Text(name),
        other => Key::Text(other.inspect()),
    }
}
