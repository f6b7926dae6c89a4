//! # Schema Documents
//!
//! [`SchemaEmitter`] describes a model class as a structural document:
//!
//! ```json
//! {
//!   "model": "Contact",
//!   "attributes": [
//!     {"name": "name", "kind": "string"},
//!     {"name": "phones", "kind": "hash", "key_type": {"kind": "symbol"}, "value_type": {"kind": "integer"}},
//!     {"name": "kind", "kind": "enum", "values": ["2D", "3D"], "options": {"default": "2D"}}
//!   ]
//! }
//! ```
//!
//! ## Type dispatch
//!
//! A type is described by the first of:
//!
//! 1. no type: `any`;
//! 2. a renderer registered for the type's identity ([`TypeDescriptor::identity`]);
//! 3. the type's own description ([`CastType::to_schema`](crate::types::CastType::to_schema));
//! 4. the built-in kinds;
//! 5. `unknown`, with the type's name as details.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::attribute::{Attribute, DefaultValue};
use crate::class::ModelClass;
use crate::types::{BuiltinType, TypeDescriptor};

pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Description of one type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeSchema {
    Any,
    String,
    Integer,
    Float,
    Boolean,
    Symbol,
    Regexp,
    Time {
        format: String,
    },
    Enum {
        values: Vec<String>,
    },
    Array {
        items: Box<TypeSchema>,
    },
    Hash {
        key_type: Box<TypeSchema>,
        value_type: Box<TypeSchema>,
    },
    Model {
        model: String,
        schema: Box<ModelSchema>,
    },
    Unknown {
        details: String,
    },
    /// Free-form document from a custom renderer or type, emitted as is.
    #[serde(untagged)]
    Document(JsonMap),
}

impl TypeSchema {
    /// `{"kind": kind}`
    pub fn kind(kind: impl Into<String>) -> Self {
        let mut document = JsonMap::new();
        document.insert("kind".to_string(), serde_json::Value::String(kind.into()));
        TypeSchema::Document(document)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSchema {
    pub name: String,
    #[serde(flatten)]
    pub type_schema: TypeSchema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<JsonMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSchema {
    pub model: String,
    pub attributes: Vec<AttributeSchema>,
}

impl ModelSchema {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }
}

pub type RenderFn = Arc<dyn Fn(&TypeDescriptor) -> TypeSchema + Send + Sync>;

/// How a registered type is rendered.
#[derive(Clone)]
pub enum TypeRenderer {
    /// Render as `{"kind": name}`.
    Kind(String),
    Custom(RenderFn),
}

impl TypeRenderer {
    pub fn custom<F>(render: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> TypeSchema + Send + Sync + 'static,
    {
        TypeRenderer::Custom(Arc::new(render))
    }

    fn render(&self, type_: &TypeDescriptor) -> TypeSchema {
        match self {
            TypeRenderer::Kind(kind) => TypeSchema::kind(kind.clone()),
            TypeRenderer::Custom(render) => render(type_),
        }
    }
}

impl fmt::Debug for TypeRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRenderer::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            TypeRenderer::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Builds schema documents, consulting registered renderers first.
#[derive(Debug, Clone, Default)]
pub struct SchemaEmitter {
    renderers: HashMap<String, TypeRenderer>,
}

impl SchemaEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render types whose identity is `identity` with `renderer`.
    pub fn register(&mut self, identity: impl Into<String>, renderer: TypeRenderer) -> &mut Self {
        self.renderers.insert(identity.into(), renderer);
        self
    }

    pub fn with_renderer(mut self, identity: impl Into<String>, renderer: TypeRenderer) -> Self {
        self.register(identity, renderer);
        self
    }

    pub fn serialize_model(&self, class: &ModelClass) -> ModelSchema {
        ModelSchema {
            model: class.schema_name(),
            attributes: class
                .attributes()
                .map(|attribute| self.describe_attribute(attribute))
                .collect(),
        }
    }

    pub fn describe_attribute(&self, attribute: &Attribute) -> AttributeSchema {
        AttributeSchema {
            name: attribute.name().to_string(),
            type_schema: self.describe_type(attribute.type_descriptor()),
            options: describe_options(attribute),
        }
    }

    pub fn describe_type(&self, type_: Option<&TypeDescriptor>) -> TypeSchema {
        let Some(type_) = type_ else {
            return TypeSchema::Any;
        };

        if let Some(renderer) = self.renderers.get(&type_.identity()) {
            return renderer.render(type_);
        }

        match type_ {
            TypeDescriptor::Custom(custom) => custom.to_schema().unwrap_or_else(|| TypeSchema::Unknown {
                details: custom.name(),
            }),
            TypeDescriptor::Builtin(builtin) => self.describe_builtin(builtin),
            TypeDescriptor::Method(method) => TypeSchema::Unknown {
                details: method.name().to_string(),
            },
        }
    }

    fn describe_builtin(&self, builtin: &BuiltinType) -> TypeSchema {
        match builtin {
            BuiltinType::String => TypeSchema::String,
            BuiltinType::Integer => TypeSchema::Integer,
            BuiltinType::Float => TypeSchema::Float,
            BuiltinType::Boolean => TypeSchema::Boolean,
            BuiltinType::Symbol => TypeSchema::Symbol,
            BuiltinType::Regexp => TypeSchema::Regexp,
            BuiltinType::Time(time) => TypeSchema::Time {
                format: time.format().to_string(),
            },
            BuiltinType::Enum(values) => TypeSchema::Enum {
                values: values.values().to_vec(),
            },
            BuiltinType::Array(item) => TypeSchema::Array {
                items: Box::new(self.describe_type(Some(item))),
            },
            BuiltinType::Hash(key, value) => TypeSchema::Hash {
                key_type: Box::new(self.describe_type(Some(key))),
                value_type: Box::new(self.describe_type(Some(value))),
            },
            BuiltinType::Model(class) => TypeSchema::Model {
                model: class.schema_name(),
                schema: Box::new(self.serialize_model(class)),
            },
        }
    }
}

fn describe_options(attribute: &Attribute) -> Option<JsonMap> {
    let options = attribute.options();
    if options.is_empty() {
        return None;
    }

    let mut described = JsonMap::new();
    match &options.default {
        Some(DefaultValue::Literal(value)) => {
            described.insert(
                "default".to_string(),
                value.to_json().unwrap_or(serde_json::Value::Null),
            );
        }
        Some(DefaultValue::Computed(_)) => {
            described.insert("computed_default".to_string(), serde_json::Value::Bool(true));
        }
        None => {}
    }
    for (name, value) in &options.extra {
        described.insert(name.clone(), value.clone());
    }
    Some(described)
}

/// Schema of `class` with no custom renderers.
pub fn serialize_model(class: &ModelClass) -> ModelSchema {
    SchemaEmitter::new().serialize_model(class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeOptions;
    use crate::error::Result;
    use crate::instance::ModelInstance;
    use crate::types;
    use crate::value::Value;
    use serde_json::json;

    #[test]
    fn untyped_attributes_are_any() {
        let class = ModelClass::with_names(["x"]).unwrap();
        assert_eq!(
            serialize_model(&class).to_json(),
            json!({"model": "Model[x]", "attributes": [{"name": "x", "kind": "any"}]})
        );
    }

    #[test]
    fn containers_describe_their_parts() {
        let emitter = SchemaEmitter::new();
        let schema = emitter.describe_type(Some(&types::hash(
            types::symbol(),
            types::array(types::time("%F")),
        )));
        assert_eq!(
            schema.to_json(),
            json!({
                "kind": "hash",
                "key_type": {"kind": "symbol"},
                "value_type": {"kind": "array", "items": {"kind": "time", "format": "%F"}}
            })
        );
    }

    #[test]
    fn options_render_defaults() {
        let class = ModelClass::builder("Position")
            .declare(
                "type",
                Some(types::enumeration(["2D", "3D"])),
                AttributeOptions::new().with_default("2D").option("description", "dimensions"),
            )
            .unwrap()
            .with_computed_default("label", types::string(), |_| Ok("x".into()))
            .unwrap()
            .build();

        assert_eq!(
            serialize_model(&class).to_json(),
            json!({
                "model": "Position",
                "attributes": [
                    {
                        "name": "type",
                        "kind": "enum",
                        "values": ["2D", "3D"],
                        "options": {"default": "2D", "description": "dimensions"}
                    },
                    {"name": "label", "kind": "string", "options": {"computed_default": true}}
                ]
            })
        );
    }

    #[test]
    fn registered_renderers_take_priority() {
        let emitter = SchemaEmitter::new()
            .with_renderer("Integer", TypeRenderer::Kind("number".into()))
            .with_renderer(
                "Time[%F]",
                TypeRenderer::custom(|_| TypeSchema::kind("date")),
            );

        assert_eq!(
            emitter.describe_type(Some(&types::integer())).to_json(),
            json!({"kind": "number"})
        );
        assert_eq!(
            emitter.describe_type(Some(&types::time("%F"))).to_json(),
            json!({"kind": "date"})
        );
        assert_eq!(
            emitter.describe_type(Some(&types::time("%T"))).to_json(),
            json!({"kind": "time", "format": "%T"})
        );
    }

    #[test]
    fn method_casts_are_unknown() {
        fn passthrough(_: &ModelInstance, raw: Value) -> Result<Value> {
            Ok(raw)
        }

        let schema = SchemaEmitter::new()
            .describe_type(Some(&TypeDescriptor::method("cast_point", passthrough)));
        assert_eq!(
            schema,
            TypeSchema::Unknown {
                details: "cast_point".into()
            }
        );
    }
}
