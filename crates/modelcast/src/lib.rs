//! # Modelcast Architecture
//!
//! Modelcast gives loosely-typed data (JSON, config files, datastore rows) a
//! typed model on top: attributes are declared once per class, cast lazily
//! per instance, serialized back to plain data, and described as schema
//! documents.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Declaration (class.rs, attribute.rs, definition.rs)        │
//! │  - Attribute registry per class, built once, then frozen    │
//! │  - Inheritance by snapshot + append                         │
//! │  - Data-driven declarations from TOML / JSON                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Resolution (instance.rs, types/)                           │
//! │  - Raw input checked against the registry on construction   │
//! │  - Per-attribute write-once cache                           │
//! │  - Cast pipeline + aggregate validation                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Output (serialize.rs, filter.rs, schema.rs)                │
//! │  - Plain-data serialization with only/except projection     │
//! │  - Schema documents with pluggable type renderers           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use modelcast::{types, ModelClass, ModelInstance, Value};
//!
//! let range = ModelClass::builder("Range")
//!     .typed("min", types::integer())?
//!     .typed("max", types::integer())?
//!     .build();
//!
//! let instance = ModelInstance::new(&range, [("min", "1"), ("max", "10")])?;
//! assert_eq!(instance.get("max")?, Value::Integer(10));
//! assert_eq!(instance.to_s()?, "Range[min: 1, max: 10]");
//! # Ok::<(), modelcast::ModelError>(())
//! ```
//!
//! ## No I/O in the Core
//!
//! Everything except [`definition`] and [`config`] is pure: no files, no
//! terminal, no globals beyond the root [`ModelClass::base`] class. The
//! `modelcast` binary is a thin client over this crate.

pub mod attribute;
pub mod class;
pub mod config;
pub mod definition;
pub mod error;
pub mod filter;
pub mod instance;
pub mod schema;
pub mod serialize;
pub mod types;
pub mod value;

pub use attribute::{Attribute, AttributeOptions, DefaultValue};
pub use class::{Accessor, ModelClass, ModelClassBuilder, Shorthand};
pub use config::ModelcastConfig;
pub use definition::{DefinitionSet, ModelDefinition};
pub use error::{CastError, CompoundError, DefinitionError, ModelError, Result};
pub use filter::AttributeFilter;
pub use instance::{ModelInstance, Serialized};
pub use schema::{serialize_model, AttributeSchema, ModelSchema, SchemaEmitter, TypeRenderer, TypeSchema};
pub use serialize::{serialize_value, to_json};
pub use types::{CastType, TypeDescriptor};
pub use value::{Key, Map, Value};
