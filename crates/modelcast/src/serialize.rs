//! Serialization of resolved values to plain data.
//!
//! [`serialize_value`] normalizes a resolved value the way `to_h` reports it:
//! nested instances become maps, containers are walked element by element,
//! map keys are normalized to identifier form, and scalar formatting is left
//! to the attribute's type (e.g. a time type renders with its format).
//!
//! The serde impls below bridge values and instances into any serde data
//! format. Symbols and patterns become strings, times become RFC 3339 text.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::Result;
use crate::instance::ModelInstance;
use crate::types::TypeDescriptor;
use crate::value::{Key, Map, Value};

/// Normalize a resolved value, guided by the type it was cast with.
pub fn serialize_value(value: &Value, type_: Option<&TypeDescriptor>) -> Result<Value> {
    if let Some(formatted) = type_.and_then(|type_| type_.format_value(value)) {
        return Ok(formatted);
    }

    match value {
        Value::Model(instance) => Ok(Value::Map(
            instance
                .to_h()?
                .into_iter()
                .map(|(name, value)| (Key::Ident(name), value))
                .collect(),
        )),
        Value::Array(items) => {
            let item_type = type_.and_then(TypeDescriptor::item_type);
            items
                .iter()
                .map(|item| serialize_value(item, item_type))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }
        Value::Map(map) => {
            let value_type = type_.and_then(TypeDescriptor::value_type);
            map.iter()
                .map(|(key, item)| Ok((key.to_ident(), serialize_value(item, value_type)?)))
                .collect::<Result<Map>>()
                .map(Value::Map)
        }
        other => Ok(other.clone()),
    }
}

impl Value {
    /// JSON rendering of this value; nested instances are serialized first.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(value) => serde_json::Value::Bool(*value),
            Value::Integer(value) => serde_json::Value::from(*value),
            Value::Float(value) => serde_json::Number::from_f64(*value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(text) | Value::Symbol(text) => serde_json::Value::String(text.clone()),
            Value::Regexp(regex) => serde_json::Value::String(regex.as_str().to_string()),
            Value::Time(time) => serde_json::Value::String(time.to_rfc3339()),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, item)| Ok((key.name().to_string(), item.to_json()?)))
                    .collect::<Result<serde_json::Map<_, _>>>()?,
            ),
            Value::Model(instance) => to_json(instance)?,
        })
    }
}

/// JSON rendering of an instance's serialized form.
pub fn to_json(instance: &ModelInstance) -> Result<serde_json::Value> {
    let object = instance
        .to_h()?
        .into_iter()
        .map(|(name, value)| Ok((name, value.to_json()?)))
        .collect::<Result<serde_json::Map<_, _>>>()?;
    Ok(serde_json::Value::Object(object))
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Integer(value) => serializer.serialize_i64(*value),
            Value::Float(value) => serializer.serialize_f64(*value),
            Value::String(text) | Value::Symbol(text) => serializer.serialize_str(text),
            Value::Regexp(regex) => serializer.serialize_str(regex.as_str()),
            Value::Time(time) => serializer.serialize_str(&time.to_rfc3339()),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, item) in map {
                    out.serialize_entry(key.name(), item)?;
                }
                out.end()
            }
            Value::Model(instance) => instance.serialize(serializer),
        }
    }
}

impl Serialize for ModelInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let serialized = self.to_h().map_err(S::Error::custom)?;
        let mut out = serializer.serialize_map(Some(serialized.len()))?;
        for (name, value) in &serialized {
            out.serialize_entry(name, value)?;
        }
        out.end()
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Deserialized maps carry textual keys, like any other external input.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
