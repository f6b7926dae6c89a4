#![allow(dead_code)]

use modelcast::{types, AttributeOptions, Map, ModelClass, ModelInstance, Result, Value};
use once_cell::sync::Lazy;
use serde_json::json;

pub static POINT: Lazy<ModelClass> = Lazy::new(|| {
    ModelClass::builder("Point")
        .attribute("x")
        .and_then(|builder| builder.attribute("y"))
        .expect("Point declares")
        .build()
});

pub static POINT_3D: Lazy<ModelClass> = Lazy::new(|| {
    ModelClass::extend(&POINT, "Point3D")
        .attribute("z")
        .expect("Point3D declares")
        .build()
});

/// Builds a `Point` for 2D positions and a `Point3D` otherwise.
fn cast_point(position: &ModelInstance, raw: Value) -> Result<Value> {
    let class = if position.get("type")? == Value::from("2D") {
        &*POINT
    } else {
        &*POINT_3D
    };
    ModelInstance::from_value(class, raw).map(Value::Model)
}

pub static POSITION: Lazy<ModelClass> = Lazy::new(|| {
    ModelClass::builder("Position")
        .declare(
            "type",
            Some(types::enumeration(["2D", "3D"])),
            AttributeOptions::new().with_default("2D"),
        )
        .and_then(|builder| {
            builder.declare(
                "point",
                Some(types::TypeDescriptor::method("cast_point", cast_point)),
                AttributeOptions::new(),
            )
        })
        .expect("Position declares")
        .build()
});

pub static ADDRESS: Lazy<ModelClass> = Lazy::new(|| {
    ModelClass::with_types([("street", types::string()), ("number", types::integer())])
        .expect("Address declares")
});

pub static BIRTHDAY: Lazy<ModelClass> = Lazy::new(|| {
    ModelClass::with_types([
        ("day", types::integer()),
        ("month", types::integer()),
        ("year", types::integer()),
    ])
    .expect("Birthday declares")
});

pub static CONTACT: Lazy<ModelClass> = Lazy::new(|| {
    ModelClass::with_types([
        ("name", types::string()),
        ("birthday", types::model(&BIRTHDAY)),
        ("phones", types::hash(types::symbol(), types::integer())),
        ("addresses", types::array(types::model(&ADDRESS))),
        ("labels", types::array(types::string())),
    ])
    .expect("Contact declares")
});

pub fn contact_json() -> serde_json::Value {
    json!({
        "name": "John",
        "birthday": {"day": 19, "month": 6, "year": 1993},
        "phones": {"office": 1234567890, "house": 456456456},
        "addresses": [
            {"street": "Lexington Avenue", "number": 123},
            {"street": "Park Avenue", "number": 456}
        ],
        "labels": ["Friend", "Work"]
    })
}

pub fn contact() -> ModelInstance {
    ModelInstance::from_value(&CONTACT, Value::from(contact_json())).expect("valid contact")
}

pub fn point(x: i64, y: i64) -> ModelInstance {
    ModelInstance::new(&POINT, [("x", x), ("y", y)]).expect("valid point")
}

pub fn point_3d(x: i64, y: i64) -> ModelInstance {
    ModelInstance::new(&POINT_3D, [("x", x), ("y", y)]).expect("valid point")
}

/// Serialized form of an instance as JSON.
pub fn json_of(instance: &ModelInstance) -> serde_json::Value {
    modelcast::to_json(instance).expect("serializable instance")
}

pub fn empty() -> Map {
    Map::new()
}
