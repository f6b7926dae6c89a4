mod common;

use common::*;
use modelcast::{
    serialize_model, types, CastError, CastType, ModelClass, ModelInstance, Result,
    SchemaEmitter, TypeDescriptor, TypeRenderer, TypeSchema, Value,
};
use serde_json::json;

#[derive(Debug)]
struct Email;

impl CastType for Email {
    fn name(&self) -> String {
        "Email".to_string()
    }

    fn cast(&self, raw: Value) -> Result<Value> {
        match raw.as_str() {
            Some(text) if text.contains('@') => Ok(Value::from(text.to_lowercase())),
            _ => Err(CastError::invalid(&raw, "Email").into()),
        }
    }

    fn to_schema(&self) -> Option<TypeSchema> {
        let mut document = modelcast::schema::JsonMap::new();
        document.insert("kind".into(), json!("string"));
        document.insert("format".into(), json!("email"));
        Some(TypeSchema::Document(document))
    }
}

#[derive(Debug)]
struct Opaque;

impl CastType for Opaque {
    fn name(&self) -> String {
        "Opaque".to_string()
    }

    fn cast(&self, raw: Value) -> Result<Value> {
        Ok(raw)
    }
}

#[test]
fn contact_schema() {
    let schema = serialize_model(&CONTACT);
    let birthday = json!({
        "model": "Model[day, month, year]",
        "attributes": [
            {"name": "day", "kind": "integer"},
            {"name": "month", "kind": "integer"},
            {"name": "year", "kind": "integer"}
        ]
    });
    let address = json!({
        "model": "Model[street, number]",
        "attributes": [
            {"name": "street", "kind": "string"},
            {"name": "number", "kind": "integer"}
        ]
    });

    assert_eq!(
        schema.to_json(),
        json!({
            "model": "Model[name, birthday, phones, addresses, labels]",
            "attributes": [
                {"name": "name", "kind": "string"},
                {
                    "name": "birthday",
                    "kind": "model",
                    "model": "Model[day, month, year]",
                    "schema": birthday
                },
                {
                    "name": "phones",
                    "kind": "hash",
                    "key_type": {"kind": "symbol"},
                    "value_type": {"kind": "integer"}
                },
                {
                    "name": "addresses",
                    "kind": "array",
                    "items": {
                        "kind": "model",
                        "model": "Model[street, number]",
                        "schema": address
                    }
                },
                {"name": "labels", "kind": "array", "items": {"kind": "string"}}
            ]
        })
    );
}

#[test]
fn position_schema() {
    let schema = serialize_model(&POSITION);
    assert_eq!(schema.model, "Position");
    assert_eq!(
        schema.to_json()["attributes"],
        json!([
            {"name": "type", "kind": "enum", "values": ["2D", "3D"], "options": {"default": "2D"}},
            {"name": "point", "kind": "unknown", "details": "cast_point"}
        ])
    );
}

#[test]
fn untyped_attributes() {
    let schema = serialize_model(&POINT_3D);
    assert_eq!(schema.model, "Point3D");
    let kinds: Vec<_> = schema
        .attributes
        .iter()
        .map(|attribute| (attribute.name.as_str(), &attribute.type_schema))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("x", &TypeSchema::Any),
            ("y", &TypeSchema::Any),
            ("z", &TypeSchema::Any)
        ]
    );
}

#[test]
fn custom_types_describe_themselves() {
    let model = ModelClass::builder("User")
        .typed("email", TypeDescriptor::custom(Email))
        .unwrap()
        .typed("blob", TypeDescriptor::custom(Opaque))
        .unwrap()
        .build();

    let schema = serialize_model(&model);
    assert_eq!(
        schema.attribute("email").unwrap().type_schema.to_json(),
        json!({"kind": "string", "format": "email"})
    );
    assert_eq!(
        schema.attribute("blob").unwrap().type_schema,
        TypeSchema::Unknown {
            details: "Opaque".into()
        }
    );

    let user = ModelInstance::new(&model, [("email", "John@Example.com"), ("blob", "x")]).unwrap();
    assert_eq!(user.get("email"), Ok(Value::from("john@example.com")));

    let invalid = ModelInstance::new(&model, [("email", "nope")]).unwrap();
    assert_eq!(
        invalid.get("email").unwrap_err().to_string(),
        "Invalid cast: 'nope' -> Email"
    );
}

#[test]
fn renderers_override_builtins_and_custom_types() {
    let model = ModelClass::builder("Event")
        .typed("at", types::time("%F"))
        .unwrap()
        .typed("attendees", types::array(types::integer()))
        .unwrap()
        .typed("owner", TypeDescriptor::custom(Email))
        .unwrap()
        .build();

    let mut emitter = SchemaEmitter::new();
    emitter
        .register("Time[%F]", TypeRenderer::Kind("date".into()))
        .register("Integer", TypeRenderer::Kind("number".into()))
        .register(
            "Email",
            TypeRenderer::custom(|type_| {
                let mut document = modelcast::schema::JsonMap::new();
                document.insert("kind".into(), json!("email"));
                document.insert("type".into(), json!(type_.to_string()));
                TypeSchema::Document(document)
            }),
        );

    assert_eq!(
        emitter.serialize_model(&model).to_json(),
        json!({
            "model": "Event",
            "attributes": [
                {"name": "at", "kind": "date"},
                {"name": "attendees", "kind": "array", "items": {"kind": "number"}},
                {"name": "owner", "kind": "email", "type": "Email"}
            ]
        })
    );
}

#[test]
fn schema_is_stable_across_calls() {
    let first = serialize_model(&CONTACT);
    let second = serialize_model(&CONTACT);
    assert_eq!(first, second);
}
