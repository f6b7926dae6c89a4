//! # Model Classes
//!
//! A [`ModelClass`] is the attribute registry of one model: an ordered list of
//! [`Attribute`]s, fixed when [`ModelClassBuilder::build`] publishes it.
//!
//! ## Declaring
//!
//! ```ignore
//! let point = ModelClass::builder("Point").attribute("x")?.attribute("y")?.build();
//! let point3d = ModelClass::extend(&point, "Point3D").attribute("z")?.build();
//! ```
//!
//! Subclasses start from a snapshot of the parent's attributes and may only
//! append. Redeclaring a name, inherited or not, fails with
//! [`ModelError::DuplicateAttribute`].
//!
//! ## Shorthand
//!
//! [`ModelClass::shorthand`] builds an anonymous subclass from bare names or
//! name/type pairs. Anonymous classes report their parent's name as their
//! model name.
//!
//! ## Reading attributes
//!
//! Instances are read by name through [`ModelInstance::get`], or through an
//! [`Accessor`] whose attribute position is looked up once.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::attribute::{Attribute, AttributeOptions, DefaultValue};
use crate::error::{ModelError, Result};
use crate::instance::ModelInstance;
use crate::types::TypeDescriptor;
use crate::value::Value;

static BASE: Lazy<ModelClass> = Lazy::new(|| ModelClass::builder("Model").build());

struct ClassInner {
    name: Option<String>,
    parent: Option<ModelClass>,
    attributes: IndexMap<String, Attribute>,
}

/// Handle to an immutable attribute registry. Clones share the registry.
#[derive(Clone)]
pub struct ModelClass(Arc<ClassInner>);

/// Attribute list for [`ModelClass::shorthand`].
#[derive(Debug, Clone)]
pub enum Shorthand {
    Names(Vec<String>),
    Typed(Vec<(String, TypeDescriptor)>),
}

impl ModelClass {
    /// Start declaring a root class.
    pub fn builder(name: impl Into<String>) -> ModelClassBuilder {
        ModelClassBuilder {
            name: Some(name.into()),
            parent: None,
            attributes: IndexMap::new(),
        }
    }

    /// Start declaring a subclass of `parent`, seeded with its attributes.
    pub fn extend(parent: &ModelClass, name: impl Into<String>) -> ModelClassBuilder {
        ModelClassBuilder::inherit(parent, Some(name.into()))
    }

    /// The root class every shorthand class without an explicit base extends.
    pub fn base() -> ModelClass {
        BASE.clone()
    }

    /// Anonymous subclass of `base` declaring exactly the given attributes.
    pub fn shorthand(base: &ModelClass, declared: Shorthand) -> Result<ModelClass> {
        let mut builder = ModelClassBuilder::inherit(base, None);
        match declared {
            Shorthand::Names(names) => {
                for name in names {
                    builder = builder.attribute(name)?;
                }
            }
            Shorthand::Typed(pairs) => {
                for (name, type_) in pairs {
                    builder = builder.typed(name, type_)?;
                }
            }
        }
        Ok(builder.build())
    }

    /// `Model[x, y]`
    pub fn with_names<I, S>(names: I) -> Result<ModelClass>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::shorthand(
            &Self::base(),
            Shorthand::Names(names.into_iter().map(Into::into).collect()),
        )
    }

    /// `Model[x: Integer, y: Integer]`
    pub fn with_types<I, S>(pairs: I) -> Result<ModelClass>
    where
        I: IntoIterator<Item = (S, TypeDescriptor)>,
        S: Into<String>,
    {
        Self::shorthand(
            &Self::base(),
            Shorthand::Typed(
                pairs
                    .into_iter()
                    .map(|(name, type_)| (name.into(), type_))
                    .collect(),
            ),
        )
    }

    /// Declared name; `None` for shorthand classes.
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// The declared name, or the nearest ancestor's.
    pub fn model_name(&self) -> &str {
        match (&self.0.name, &self.0.parent) {
            (Some(name), _) => name,
            (None, Some(parent)) => parent.model_name(),
            (None, None) => "Model",
        }
    }

    /// Name used in schema documents: the declared name, else the class rendering.
    pub fn schema_name(&self) -> String {
        match &self.0.name {
            Some(name) => name.clone(),
            None => self.to_string(),
        }
    }

    pub fn parent(&self) -> Option<&ModelClass> {
        self.0.parent.as_ref()
    }

    /// All attributes, inherited first, in declaration order.
    pub fn attributes(&self) -> impl ExactSizeIterator<Item = &Attribute> + '_ {
        self.0.attributes.values()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.0.attributes.get(name)
    }

    pub fn attribute_at(&self, index: usize) -> Option<&Attribute> {
        self.0.attributes.get_index(index).map(|(_, attribute)| attribute)
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.0.attributes.get_index_of(name)
    }

    pub fn attribute_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.0.attributes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.attributes.is_empty()
    }

    /// Pre-resolved reader for one attribute.
    pub fn accessor(&self, name: &str) -> Option<Accessor> {
        self.attribute_index(name).map(|index| Accessor {
            class: self.clone(),
            index,
        })
    }

    /// True when `self` is `other` or one of its descendants.
    pub fn is_a(&self, other: &ModelClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class.same_class(other) {
                return true;
            }
            current = class.parent();
        }
        false
    }

    pub fn same_class(&self, other: &ModelClass) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl fmt::Display for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.attribute_names().collect();
        write!(f, "{}[{}]", self.model_name(), names.join(", "))
    }
}

impl fmt::Debug for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClass")
            .field("name", &self.model_name())
            .field("attributes", &self.attribute_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Declares the attributes of a class before it is published.
pub struct ModelClassBuilder {
    name: Option<String>,
    parent: Option<ModelClass>,
    attributes: IndexMap<String, Attribute>,
}

impl ModelClassBuilder {
    fn inherit(parent: &ModelClass, name: Option<String>) -> Self {
        Self {
            name,
            parent: Some(parent.clone()),
            attributes: parent.0.attributes.clone(),
        }
    }

    /// Append one attribute.
    pub fn declare(
        mut self,
        name: impl Into<String>,
        type_: Option<TypeDescriptor>,
        options: AttributeOptions,
    ) -> Result<Self> {
        let name = name.into();
        if self.attributes.contains_key(&name) {
            return Err(ModelError::DuplicateAttribute(name));
        }
        let attribute = Attribute::new(name.clone(), type_, options);
        self.attributes.insert(name, attribute);
        Ok(self)
    }

    /// Untyped attribute without options.
    pub fn attribute(self, name: impl Into<String>) -> Result<Self> {
        self.declare(name, None, AttributeOptions::new())
    }

    pub fn typed(self, name: impl Into<String>, type_: TypeDescriptor) -> Result<Self> {
        self.declare(name, Some(type_), AttributeOptions::new())
    }

    /// Typed attribute with a literal default.
    pub fn with_default(
        self,
        name: impl Into<String>,
        type_: TypeDescriptor,
        default: impl Into<Value>,
    ) -> Result<Self> {
        self.declare(name, Some(type_), AttributeOptions::new().with_default(default))
    }

    /// Typed attribute whose default is computed from the instance.
    pub fn with_computed_default<F>(
        self,
        name: impl Into<String>,
        type_: TypeDescriptor,
        default: F,
    ) -> Result<Self>
    where
        F: Fn(&ModelInstance) -> Result<Value> + Send + Sync + 'static,
    {
        let options = AttributeOptions {
            default: Some(DefaultValue::computed(default)),
            ..AttributeOptions::default()
        };
        self.declare(name, Some(type_), options)
    }

    pub fn build(self) -> ModelClass {
        ModelClass(Arc::new(ClassInner {
            name: self.name,
            parent: self.parent,
            attributes: self.attributes,
        }))
    }
}

/// Reads one attribute of instances of a class (or its subclasses).
#[derive(Debug, Clone)]
pub struct Accessor {
    class: ModelClass,
    index: usize,
}

impl Accessor {
    pub fn name(&self) -> &str {
        self.class
            .attribute_at(self.index)
            .map(Attribute::name)
            .unwrap_or_default()
    }

    pub fn get(&self, instance: &ModelInstance) -> Result<Value> {
        if !instance.class().is_a(&self.class) {
            return Err(ModelError::InvalidAttributes(vec![self.name().to_string()]));
        }
        instance.resolve_at(self.index)
    }
}
