//! Loosely-typed values.
//!
//! Raw model input and resolved attribute values share one representation,
//! [`Value`]. Mapping keys carry the form they were supplied in ([`Key`]):
//! identifier keys and textual keys name the same attribute ("indifferent
//! access") but stay distinguishable until serialization normalizes them.
//!
//! | Variant | Holds |
//! |---------|-------|
//! | `Null` | absence of a value |
//! | `Bool`, `Integer`, `Float` | scalars |
//! | `String` | text |
//! | `Symbol` | identifier-like text |
//! | `Regexp` | compiled pattern |
//! | `Time` | timestamp with offset |
//! | `Array`, `Map` | containers |
//! | `Model` | nested model instance |

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use regex::Regex;

use crate::instance::ModelInstance;

/// Ordered mapping used for raw input and nested hashes.
pub type Map = IndexMap<Key, Value>;

/// A mapping key, in identifier or textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Ident(String),
    Text(String),
}

impl Key {
    pub fn ident(name: impl Into<String>) -> Self {
        Key::Ident(name.into())
    }

    pub fn text(name: impl Into<String>) -> Self {
        Key::Text(name.into())
    }

    /// The bare name, whatever the form.
    pub fn name(&self) -> &str {
        match self {
            Key::Ident(name) | Key::Text(name) => name,
        }
    }

    pub fn is_ident(&self) -> bool {
        matches!(self, Key::Ident(_))
    }

    /// The same name in the other form.
    pub fn other_form(&self) -> Key {
        match self {
            Key::Ident(name) => Key::Text(name.clone()),
            Key::Text(name) => Key::Ident(name.clone()),
        }
    }

    /// The canonical (identifier) form of this key.
    pub fn to_ident(&self) -> Key {
        Key::Ident(self.name().to_string())
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Ident(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Ident(name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Symbol(String),
    Regexp(Regex),
    Time(DateTime<FixedOffset>),
    Array(Vec<Value>),
    Map(Map),
    Model(ModelInstance),
}

impl Value {
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Floats, and integers widened to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            Value::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Text of a string or a symbol.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) | Value::Symbol(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_regex(&self) -> Option<&Regex> {
        match self {
            Value::Regexp(regex) => Some(regex),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Time(time) => Some(time),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&ModelInstance> {
        match self {
            Value::Model(instance) => Some(instance),
            _ => None,
        }
    }

    /// Look up a map entry by name, accepting either key form.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let map = self.as_map()?;
        map.get(&Key::ident(name))
            .or_else(|| map.get(&Key::text(name)))
    }

    /// Debug rendering used by `ModelInstance::to_s`.
    pub fn inspect(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(value) => value.to_string(),
            Value::Integer(value) => value.to_string(),
            Value::Float(value) => format!("{value:?}"),
            Value::String(text) => format!("{text:?}"),
            Value::Symbol(name) => format!(":{name}"),
            Value::Regexp(regex) => format!("/{}/", regex.as_str()),
            Value::Time(time) => time.to_rfc3339(),
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(Value::inspect).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Map(map) => {
                let entries: Vec<String> = map
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key.name(), value.inspect()))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            Value::Model(instance) => instance.to_string(),
        }
    }

    /// Rendering used inside cast error messages: strings in single quotes.
    pub fn quoted(&self) -> String {
        match self {
            Value::String(text) => format!("'{text}'"),
            other => other.inspect(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b).is_eq(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Regexp(a), Value::Regexp(b)) => a.as_str() == b.as_str(),
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Model(a), Value::Model(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(value) => value.hash(state),
            Value::Integer(value) => value.hash(state),
            Value::Float(value) => value.to_bits().hash(state),
            Value::String(text) | Value::Symbol(text) => text.hash(state),
            Value::Regexp(regex) => regex.as_str().hash(state),
            Value::Time(time) => time.hash(state),
            Value::Array(items) => items.hash(state),
            Value::Map(map) => hash_unordered(map, state),
            Value::Model(instance) => instance.hash(state),
        }
    }
}

/// Map equality ignores entry order, so the hash must too.
pub(crate) fn hash_unordered<H: Hasher>(map: &Map, state: &mut H) {
    let mut combined: u64 = 0;
    for (key, value) in map {
        let mut entry = DefaultHasher::new();
        key.hash(&mut entry);
        value.hash(&mut entry);
        combined = combined.wrapping_add(entry.finish());
    }
    map.len().hash(state);
    combined.hash(state);
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<Regex> for Value {
    fn from(regex: Regex) -> Self {
        Value::Regexp(regex)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(time: DateTime<FixedOffset>) -> Self {
        Value::Time(time)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(time: DateTime<Utc>) -> Self {
        Value::Time(time.fixed_offset())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<ModelInstance> for Value {
    fn from(instance: ModelInstance) -> Self {
        Value::Model(instance)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// JSON objects carry textual keys.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(value) => Value::Bool(value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(integer) => Value::Integer(integer),
                None => Value::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(text) => Value::String(text),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(object) => Value::Map(
                object
                    .into_iter()
                    .map(|(key, value)| (Key::Text(key), Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Build a [`Map`] from `key => value` pairs; keys default to identifier form.
///
/// ```
/// use modelcast::{value_map, Key, Value};
///
/// let map = value_map! { "x" => 1, Key::text("y") => "two" };
/// assert_eq!(map.get(&Key::ident("x")), Some(&Value::Integer(1)));
/// ```
#[macro_export]
macro_rules! value_map {
    () => {
        $crate::Map::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Map::new();
        $(
            map.insert($crate::Key::from($key), $crate::Value::from($value));
        )+
        map
    }};
}
