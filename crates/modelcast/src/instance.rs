//! # Model Instances
//!
//! A [`ModelInstance`] wraps raw input for one [`ModelClass`] and resolves
//! attributes on demand.
//!
//! ## Resolution
//!
//! Each attribute moves from unresolved to resolved at most once:
//!
//! 1. a cached value is returned as is;
//! 2. a raw value (identifier key first, then textual key) is cast and cached;
//! 3. otherwise the default (literal, or computed from the instance) is cast and cached;
//! 4. otherwise [`ModelError::NotAssignedAttribute`] is returned and nothing is cached.
//!
//! An attribute whose computed default reaches back to the same attribute
//! fails with [`ModelError::CyclicDefault`] instead of re-entering its cell.
//!
//! A failed cast is never cached, so the failure repeats on every access.
//!
//! ## Validation
//!
//! [`ModelInstance::validate`] resolves every assigned or defaulted attribute
//! and descends into nested instances, collecting all failures into one
//! [`CompoundError`] keyed by dotted path. `to_h` and `to_s` run it first.
//!
//! ## Equality
//!
//! | Method | Holds when |
//! |--------|------------|
//! | [`ModelInstance::loose_eq`] | `other`'s class is `self`'s class or a subclass, and serialized forms match |
//! | `==` / [`ModelInstance::strict_eq`] | same concrete class, and serialized forms match |

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::attribute::Attribute;
use crate::class::ModelClass;
use crate::error::{CastError, CompoundError, ModelError, Result};
use crate::filter::AttributeFilter;
use crate::serialize::serialize_value;
use crate::value::{hash_unordered, Key, Map, Value};

/// Serialized form of an instance: attribute name to plain value.
pub type Serialized = IndexMap<String, Value>;

struct InstanceInner {
    class: ModelClass,
    raw: Map,
    cache: Vec<OnceCell<Value>>,
    resolving: Vec<AtomicBool>,
    serialized: OnceCell<Serialized>,
}

/// Clears an attribute's resolving flag when resolution finishes or fails.
struct ResolvingGuard<'a>(&'a AtomicBool);

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// An instance of a model class. Clones share raw input and cache.
#[derive(Clone)]
pub struct ModelInstance(Arc<InstanceInner>);

impl ModelInstance {
    /// Construct from any `(key, value)` pairs.
    ///
    /// Fails with [`ModelError::InvalidAttributes`] naming every key the class
    /// does not declare.
    pub fn new<I, K, V>(class: &ModelClass, raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let raw: Map = raw
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self::from_map(class, raw)
    }

    pub fn from_map(class: &ModelClass, raw: Map) -> Result<Self> {
        let mut invalid: Vec<String> = Vec::new();
        for key in raw.keys() {
            let name = key.name();
            if class.attribute_index(name).is_none() && !invalid.iter().any(|seen| seen == name) {
                invalid.push(name.to_string());
            }
        }
        if !invalid.is_empty() {
            return Err(ModelError::InvalidAttributes(invalid));
        }

        Ok(Self(Arc::new(InstanceInner {
            class: class.clone(),
            raw,
            cache: (0..class.len()).map(|_| OnceCell::new()).collect(),
            resolving: (0..class.len()).map(|_| AtomicBool::new(false)).collect(),
            serialized: OnceCell::new(),
        })))
    }

    /// Construct from a [`Value::Map`].
    pub fn from_value(class: &ModelClass, raw: Value) -> Result<Self> {
        match raw {
            Value::Map(map) => Self::from_map(class, map),
            other => Err(CastError::invalid(&other, format!("Model[{}]", class.schema_name())).into()),
        }
    }

    /// The concrete class.
    pub fn class(&self) -> &ModelClass {
        &self.0.class
    }

    /// Raw input as given.
    pub fn raw(&self) -> &Map {
        &self.0.raw
    }

    /// True when the raw input carries a value for `name`; defaults do not count.
    pub fn assigned(&self, name: &str) -> bool {
        self.raw_value(name).is_some()
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.0
            .class
            .attribute_index(name)
            .is_some_and(|index| self.0.cache[index].get().is_some())
    }

    /// Resolve the attribute called `name`.
    ///
    /// A [`ModelError::Compound`] returned here (from a nested model or
    /// container cast) keys its paths relative to the attribute, e.g. `day`
    /// rather than `birthday.day`. Only [`ModelInstance::validate`] prefixes
    /// them with the attribute name.
    pub fn get(&self, name: &str) -> Result<Value> {
        match self.0.class.attribute_index(name) {
            Some(index) => self.resolve_at(index),
            None => Err(ModelError::InvalidAttributes(vec![name.to_string()])),
        }
    }

    pub fn resolve(&self, attribute: &Attribute) -> Result<Value> {
        self.get(attribute.name())
    }

    pub(crate) fn resolve_at(&self, index: usize) -> Result<Value> {
        let Some(attribute) = self.0.class.attribute_at(index) else {
            return Err(ModelError::InvalidAttributes(vec![index.to_string()]));
        };
        let cell = &self.0.cache[index];
        if let Some(value) = cell.get() {
            trace!(attribute = attribute.name(), "attribute cache hit");
            return Ok(value.clone());
        }

        let name = attribute.name();
        let flag = &self.0.resolving[index];
        if flag.swap(true, Ordering::AcqRel) {
            return Err(ModelError::CyclicDefault(name.to_string()));
        }
        let _guard = ResolvingGuard(flag);
        let value = cell.get_or_try_init(|| {
            let raw = if let Some(raw) = self.raw_value(name) {
                debug!(model = self.0.class.model_name(), attribute = name, "resolving from raw input");
                raw.clone()
            } else if let Some(default) = attribute.default_value() {
                debug!(model = self.0.class.model_name(), attribute = name, "resolving from default");
                default.evaluate(self)?
            } else {
                return Err(ModelError::NotAssignedAttribute(name.to_string()));
            };

            match attribute.type_descriptor() {
                Some(type_) => type_.cast_for(Some(self), raw),
                None => Ok(raw),
            }
        })?;
        Ok(value.clone())
    }

    fn raw_value(&self, name: &str) -> Option<&Value> {
        let raw = &self.0.raw;
        raw.get(&Key::ident(name)).or_else(|| raw.get(&Key::text(name)))
    }

    /// Resolve every assigned or defaulted attribute, nested instances included.
    ///
    /// All cast failures are reported together as one [`ModelError::Compound`].
    /// Other failures (e.g. a computed default reading an unassigned
    /// attribute) are returned directly.
    pub fn validate(&self) -> Result<()> {
        let mut errors = CompoundError::new();
        for (index, attribute) in self.0.class.attributes().enumerate() {
            let name = attribute.name();
            if !self.assigned(name) && !attribute.has_default() {
                continue;
            }
            match self.resolve_at(index) {
                Ok(value) => validate_nested(&value, name, &mut errors)?,
                Err(error) => errors.collect(name, error)?,
            }
        }

        if !errors.is_empty() {
            debug!(
                model = self.0.class.model_name(),
                paths = ?errors.paths().collect::<Vec<_>>(),
                "validation failed"
            );
        }
        errors.into_result()
    }

    /// A new instance from this one's raw input overlaid with `changes`.
    ///
    /// Keys match by name, so a change wins whichever key form either side used.
    pub fn merge<I, K, V>(&self, changes: I) -> Result<ModelInstance>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let mut raw = self.0.raw.clone();
        for (key, value) in changes {
            let key = key.into();
            raw.shift_remove(&key.other_form());
            raw.insert(key, value.into());
        }
        Self::from_map(&self.0.class, raw)
    }

    /// Serialized form of every resolved attribute, in declaration order.
    pub fn to_h(&self) -> Result<Serialized> {
        self.0
            .serialized
            .get_or_try_init(|| {
                self.validate()?;
                let mut serialized = Serialized::new();
                for (index, attribute) in self.0.class.attributes().enumerate() {
                    if let Some(value) = self.0.cache[index].get() {
                        serialized.insert(
                            attribute.name().to_string(),
                            serialize_value(value, attribute.type_descriptor())?,
                        );
                    }
                }
                Ok(serialized)
            })
            .cloned()
    }

    pub fn to_h_filtered(&self, filter: &AttributeFilter) -> Result<Serialized> {
        Ok(filter.apply(&self.to_h()?))
    }

    /// `ModelName[name: value, ...]` over the resolved attributes.
    pub fn to_s(&self) -> Result<String> {
        self.validate()?;
        let entries: Vec<String> = self
            .0
            .class
            .attributes()
            .enumerate()
            .filter_map(|(index, attribute)| {
                self.0.cache[index]
                    .get()
                    .map(|value| format!("{}: {}", attribute.name(), value.inspect()))
            })
            .collect();
        Ok(format!("{}[{}]", self.0.class.model_name(), entries.join(", ")))
    }

    /// `other` is an instance of this class (or a subclass) with the same serialized form.
    pub fn loose_eq(&self, other: &ModelInstance) -> bool {
        other.class().is_a(self.class()) && self.same_content(other)
    }

    /// Same concrete class and same serialized form.
    pub fn strict_eq(&self, other: &ModelInstance) -> bool {
        self.class().same_class(other.class()) && self.same_content(other)
    }

    fn same_content(&self, other: &ModelInstance) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        match (self.to_h(), other.to_h()) {
            (Ok(mine), Ok(theirs)) => mine == theirs,
            (Err(_), Err(_)) => self.0.raw == other.0.raw,
            _ => false,
        }
    }
}

fn validate_nested(value: &Value, path: &str, errors: &mut CompoundError) -> Result<()> {
    match value {
        Value::Model(instance) => match instance.validate() {
            Ok(()) => Ok(()),
            Err(error) => errors.collect(path, error),
        },
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                validate_nested(item, &format!("{path}.{index}"), errors)?;
            }
            Ok(())
        }
        Value::Map(map) => {
            for (key, item) in map {
                validate_nested(item, &format!("{path}.{}", key.name()), errors)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

impl PartialEq for ModelInstance {
    fn eq(&self, other: &Self) -> bool {
        self.strict_eq(other)
    }
}

impl Eq for ModelInstance {}

impl Hash for ModelInstance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.class.identity().hash(state);
        match self.to_h() {
            Ok(serialized) => {
                for (name, value) in &serialized {
                    name.hash(state);
                    value.hash(state);
                }
            }
            Err(_) => hash_unordered(&self.0.raw, state),
        }
    }
}

impl fmt::Display for ModelInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_s() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}[<invalid>]", self.0.class.model_name()),
        }
    }
}

impl fmt::Debug for ModelInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelInstance")
            .field("class", &self.0.class.model_name())
            .field("raw", &self.0.raw)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;
    use crate::value_map;

    fn point() -> ModelClass {
        ModelClass::builder("Point")
            .attribute("x")
            .unwrap()
            .attribute("y")
            .unwrap()
            .build()
    }

    #[test]
    fn unknown_keys_are_all_reported() {
        let error = ModelInstance::new(&point(), [("x", 1), ("z", 3), ("w", 4)]).unwrap_err();
        assert_eq!(
            error,
            ModelError::InvalidAttributes(vec!["z".into(), "w".into()])
        );
    }

    #[test]
    fn unknown_key_in_both_forms_is_reported_once() {
        let raw = value_map! { "z" => 1, Key::text("z") => 2 };
        let error = ModelInstance::from_map(&point(), raw).unwrap_err();
        assert_eq!(error, ModelError::InvalidAttributes(vec!["z".into()]));
    }

    #[test]
    fn ident_key_wins_over_text_key() {
        let raw = value_map! { Key::text("x") => 1, "x" => 2 };
        let instance = ModelInstance::from_map(&point(), raw).unwrap();
        assert_eq!(instance.get("x"), Ok(Value::Integer(2)));
    }

    #[test]
    fn unknown_names_fail_on_get() {
        let instance = ModelInstance::new(&point(), [("x", 1)]).unwrap();
        assert_eq!(
            instance.get("q"),
            Err(ModelError::InvalidAttributes(vec!["q".into()]))
        );
    }

    #[test]
    fn resolution_is_cached() {
        let class = ModelClass::with_types([("n", types::integer())]).unwrap();
        let instance = ModelInstance::new(&class, [("n", "5")]).unwrap();

        assert!(!instance.is_resolved("n"));
        assert_eq!(instance.get("n"), Ok(Value::Integer(5)));
        assert!(instance.is_resolved("n"));
        assert_eq!(instance.get("n"), Ok(Value::Integer(5)));
    }

    #[test]
    fn failed_casts_are_not_cached() {
        let class = ModelClass::with_types([("n", types::integer())]).unwrap();
        let instance = ModelInstance::new(&class, [("n", "five")]).unwrap();

        assert!(instance.get("n").is_err());
        assert!(!instance.is_resolved("n"));
        assert!(instance.get("n").is_err());
    }

    #[test]
    fn from_value_requires_a_map() {
        assert!(matches!(
            ModelInstance::from_value(&point(), Value::Integer(1)),
            Err(ModelError::Cast(_))
        ));
    }

    #[test]
    fn validate_skips_unassigned_attributes() {
        let instance = ModelInstance::new(&point(), [("x", 1)]).unwrap();
        assert_eq!(instance.validate(), Ok(()));
        assert_eq!(instance.to_s().unwrap(), "Point[x: 1]");
    }

    #[test]
    fn display_marks_invalid_instances() {
        let class = ModelClass::builder("Flag")
            .typed("on", types::boolean())
            .unwrap()
            .build();
        let instance = ModelInstance::new(&class, [("on", "maybe")]).unwrap();
        assert_eq!(instance.to_string(), "Flag[<invalid>]");
    }

    #[test]
    fn merge_replaces_either_key_form() {
        let original =
            ModelInstance::from_map(&point(), value_map! { Key::text("x") => 1, "y" => 2 }).unwrap();
        let merged = original.merge([("x", 10)]).unwrap();

        assert_eq!(merged.get("x"), Ok(Value::Integer(10)));
        assert_eq!(merged.raw().len(), 2);
        assert_eq!(original.get("x"), Ok(Value::Integer(1)));
    }

    #[test]
    fn invalid_instances_compare_by_raw_input() {
        let class = ModelClass::with_types([("n", types::integer())]).unwrap();
        let a = ModelInstance::new(&class, [("n", "x")]).unwrap();
        let b = ModelInstance::new(&class, [("n", "x")]).unwrap();
        assert_eq!(a, b);
    }
}
