//! # Attribute Types
//!
//! An attribute's type decides how its raw value is cast and, for some types,
//! how the resolved value is written back out. Types come in three shapes:
//!
//! | Shape | Cast | Schema |
//! |-------|------|--------|
//! | [`TypeDescriptor::Method`] | a function receiving the owning instance | `unknown` |
//! | [`TypeDescriptor::Builtin`] | the closed set in [`BuiltinType`] | built-in kinds |
//! | [`TypeDescriptor::Custom`] | any [`CastType`] implementation | `to_schema()` or `unknown` |
//!
//! Attributes without a type keep their raw value.
//!
//! ## Constructors
//!
//! ```ignore
//! use modelcast::types;
//!
//! types::string();
//! types::time("%F");
//! types::enumeration(["2D", "3D"]);
//! types::array(types::model(&ADDRESS));
//! types::hash(types::symbol(), types::integer());
//! ```

mod composite;
mod scalar;
mod time;

use std::fmt;
use std::sync::Arc;

use crate::class::ModelClass;
use crate::error::{CastError, Result};
use crate::instance::ModelInstance;
use crate::schema::TypeSchema;
use crate::value::Value;

pub use composite::EnumType;
pub use time::TimeType;

/// Capability interface for types defined outside this crate.
///
/// `cast` fails with a `CastError` for a single bad value or a
/// `CompoundError` when the value has inner parts that failed.
pub trait CastType: fmt::Debug + Send + Sync {
    /// Display name; also the identity used by schema renderer registries.
    fn name(&self) -> String;

    fn cast(&self, raw: Value) -> Result<Value>;

    /// Self-description for schema documents.
    fn to_schema(&self) -> Option<TypeSchema> {
        None
    }

    /// Plain-data rendering of a resolved value, when it differs from the value itself.
    fn serialize(&self, _value: &Value) -> Option<Value> {
        None
    }
}

/// Cast function that receives the owning instance, so it can consult other attributes.
pub type CastFn = fn(&ModelInstance, Value) -> Result<Value>;

/// A named cast function, resolved when the attribute is declared.
#[derive(Clone, Copy)]
pub struct NamedCast {
    name: &'static str,
    func: CastFn,
}

impl NamedCast {
    pub const fn new(name: &'static str, func: CastFn) -> Self {
        Self { name, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, instance: &ModelInstance, raw: Value) -> Result<Value> {
        (self.func)(instance, raw)
    }
}

impl fmt::Debug for NamedCast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamedCast").field(&self.name).finish()
    }
}

/// The closed set of types this crate knows how to cast and describe.
#[derive(Debug, Clone)]
pub enum BuiltinType {
    String,
    Integer,
    Float,
    Boolean,
    Symbol,
    Regexp,
    Time(TimeType),
    Enum(EnumType),
    Array(Box<TypeDescriptor>),
    Hash(Box<TypeDescriptor>, Box<TypeDescriptor>),
    Model(ModelClass),
}

impl BuiltinType {
    fn cast(&self, owner: Option<&ModelInstance>, raw: Value) -> Result<Value> {
        if raw.is_null() {
            return Ok(raw);
        }
        match self {
            BuiltinType::String => scalar::cast_string(raw),
            BuiltinType::Integer => scalar::cast_integer(raw),
            BuiltinType::Float => scalar::cast_float(raw),
            BuiltinType::Boolean => scalar::cast_boolean(raw),
            BuiltinType::Symbol => scalar::cast_symbol(raw),
            BuiltinType::Regexp => scalar::cast_regexp(raw),
            BuiltinType::Time(time) => time.cast(raw),
            BuiltinType::Enum(values) => values.cast(raw),
            BuiltinType::Array(item) => composite::cast_array(self, item, owner, raw),
            BuiltinType::Hash(key, value) => composite::cast_hash(self, key, value, owner, raw),
            BuiltinType::Model(class) => composite::cast_model(class, raw),
        }
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuiltinType::String => f.write_str("String"),
            BuiltinType::Integer => f.write_str("Integer"),
            BuiltinType::Float => f.write_str("Float"),
            BuiltinType::Boolean => f.write_str("Boolean"),
            BuiltinType::Symbol => f.write_str("Symbol"),
            BuiltinType::Regexp => f.write_str("Regexp"),
            BuiltinType::Time(time) => write!(f, "Time[{}]", time.format()),
            BuiltinType::Enum(values) => write!(f, "Enum[{}]", values.values().join(", ")),
            BuiltinType::Array(item) => write!(f, "Array[{item}]"),
            BuiltinType::Hash(key, value) => write!(f, "Hash[{key}, {value}]"),
            BuiltinType::Model(class) => write!(f, "Model[{}]", class.schema_name()),
        }
    }
}

/// The declared type of an attribute.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Method(NamedCast),
    Builtin(BuiltinType),
    Custom(Arc<dyn CastType>),
}

impl TypeDescriptor {
    pub fn method(name: &'static str, func: CastFn) -> Self {
        TypeDescriptor::Method(NamedCast::new(name, func))
    }

    pub fn custom(cast_type: impl CastType + 'static) -> Self {
        TypeDescriptor::Custom(Arc::new(cast_type))
    }

    /// Identity used to look up registered schema renderers.
    pub fn identity(&self) -> String {
        self.to_string()
    }

    /// Cast without an owning instance. Method casts need one and fail here.
    pub fn cast(&self, raw: Value) -> Result<Value> {
        self.cast_for(None, raw)
    }

    pub(crate) fn cast_for(&self, owner: Option<&ModelInstance>, raw: Value) -> Result<Value> {
        match self {
            TypeDescriptor::Method(method) => match owner {
                Some(instance) => method.call(instance, raw),
                None => Err(CastError::new(format!(
                    "{} can only be cast within a model instance",
                    method.name()
                ))
                .into()),
            },
            TypeDescriptor::Builtin(builtin) => builtin.cast(owner, raw),
            TypeDescriptor::Custom(custom) => custom.cast(raw),
        }
    }

    pub fn as_builtin(&self) -> Option<&BuiltinType> {
        match self {
            TypeDescriptor::Builtin(builtin) => Some(builtin),
            _ => None,
        }
    }

    /// Element type of an array type.
    pub fn item_type(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Builtin(BuiltinType::Array(item)) => Some(item),
            _ => None,
        }
    }

    pub fn key_type(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Builtin(BuiltinType::Hash(key, _)) => Some(key),
            _ => None,
        }
    }

    pub fn value_type(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Builtin(BuiltinType::Hash(_, value)) => Some(value),
            _ => None,
        }
    }

    /// Type-driven rendering of a resolved scalar for serialization.
    pub fn format_value(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (TypeDescriptor::Builtin(BuiltinType::Time(time)), Value::Time(at)) => {
                Some(Value::String(time.render(at)))
            }
            (TypeDescriptor::Custom(custom), value) => custom.serialize(value),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Method(method) => f.write_str(method.name()),
            TypeDescriptor::Builtin(builtin) => fmt::Display::fmt(builtin, f),
            TypeDescriptor::Custom(custom) => f.write_str(&custom.name()),
        }
    }
}

impl From<BuiltinType> for TypeDescriptor {
    fn from(builtin: BuiltinType) -> Self {
        TypeDescriptor::Builtin(builtin)
    }
}

pub fn string() -> TypeDescriptor {
    BuiltinType::String.into()
}

pub fn integer() -> TypeDescriptor {
    BuiltinType::Integer.into()
}

pub fn float() -> TypeDescriptor {
    BuiltinType::Float.into()
}

pub fn boolean() -> TypeDescriptor {
    BuiltinType::Boolean.into()
}

pub fn symbol() -> TypeDescriptor {
    BuiltinType::Symbol.into()
}

pub fn regexp() -> TypeDescriptor {
    BuiltinType::Regexp.into()
}

pub fn time(format: impl Into<String>) -> TypeDescriptor {
    BuiltinType::Time(TimeType::new(format)).into()
}

pub fn enumeration<I, S>(values: I) -> TypeDescriptor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    BuiltinType::Enum(EnumType::new(values)).into()
}

pub fn array(item: TypeDescriptor) -> TypeDescriptor {
    BuiltinType::Array(Box::new(item)).into()
}

pub fn hash(key: TypeDescriptor, value: TypeDescriptor) -> TypeDescriptor {
    BuiltinType::Hash(Box::new(key), Box::new(value)).into()
}

pub fn model(class: &ModelClass) -> TypeDescriptor {
    BuiltinType::Model(class.clone()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    #[derive(Debug)]
    struct Upcase;

    impl CastType for Upcase {
        fn name(&self) -> String {
            "Upcase".to_string()
        }

        fn cast(&self, raw: Value) -> Result<Value> {
            match raw.as_str() {
                Some(text) => Ok(Value::String(text.to_uppercase())),
                None => Err(CastError::invalid(&raw, self.name()).into()),
            }
        }
    }

    #[test]
    fn display_names_nest() {
        assert_eq!(integer().to_string(), "Integer");
        assert_eq!(time("%F").to_string(), "Time[%F]");
        assert_eq!(enumeration(["2D", "3D"]).to_string(), "Enum[2D, 3D]");
        assert_eq!(array(string()).to_string(), "Array[String]");
        assert_eq!(hash(symbol(), integer()).to_string(), "Hash[Symbol, Integer]");
    }

    #[test]
    fn builtins_pass_null_through() {
        assert_eq!(integer().cast(Value::Null), Ok(Value::Null));
        assert_eq!(array(integer()).cast(Value::Null), Ok(Value::Null));
    }

    #[test]
    fn custom_types_cast_through_trait() {
        let upcase = TypeDescriptor::custom(Upcase);
        assert_eq!(upcase.cast(Value::from("abc")), Ok(Value::from("ABC")));
        assert_eq!(upcase.identity(), "Upcase");
        assert!(matches!(upcase.cast(Value::Integer(1)), Err(ModelError::Cast(_))));
    }

    #[test]
    fn method_casts_need_an_instance() {
        fn passthrough(_: &ModelInstance, raw: Value) -> Result<Value> {
            Ok(raw)
        }

        let method = TypeDescriptor::method("passthrough", passthrough);
        assert_eq!(method.to_string(), "passthrough");
        assert!(method.cast(Value::Integer(1)).is_err());
    }

    #[test]
    fn container_accessors() {
        let list = array(integer());
        assert_eq!(list.item_type().map(ToString::to_string), Some("Integer".into()));
        assert!(list.value_type().is_none());

        let phones = hash(symbol(), integer());
        assert_eq!(phones.key_type().map(ToString::to_string), Some("Symbol".into()));
        assert_eq!(phones.value_type().map(ToString::to_string), Some("Integer".into()));
    }
}
