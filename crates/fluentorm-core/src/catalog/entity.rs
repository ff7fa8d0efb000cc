//! Entity schema registration.

use super::guard::{Fillable, Guarded};
use super::property::PropertyDef;
use crate::config::ModelConfig;

/// A shared behaviour mixed into an entity.
///
/// Public properties a mixin contributes belong to the behaviour, not to the
/// entity's data, and are never bound to attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mixin {
    /// Mixin name.
    pub name: String,
    /// Names of the public properties the mixin provides.
    pub properties: Vec<String>,
}

impl Mixin {
    /// Create a mixin without properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Add a provided property name.
    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.properties.push(name.into());
        self
    }

    /// Check if the mixin provides a property.
    pub fn provides(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p == name)
    }
}

/// Declarative registration of one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    /// Entity name.
    pub name: String,
    /// Base model configuration.
    pub config: ModelConfig,
    /// Class-level fillable marker.
    pub fillable: Option<Fillable>,
    /// Class-level guarded marker.
    pub guarded: Option<Guarded>,
    /// Properties declared by the entity itself, in declaration order.
    pub properties: Vec<PropertyDef>,
    /// Properties declared by a parent type.
    pub inherited: Vec<PropertyDef>,
    /// Mixed-in behaviours.
    pub mixins: Vec<Mixin>,
}

impl EntitySchema {
    /// Create a new entity schema with default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: ModelConfig::default(),
            fillable: None,
            guarded: None,
            properties: Vec::new(),
            inherited: Vec::new(),
            mixins: Vec::new(),
        }
    }

    /// Set the base model configuration.
    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Mark the entity fillable.
    pub fn with_fillable(mut self, fillable: Fillable) -> Self {
        self.fillable = Some(fillable);
        self
    }

    /// Mark the entity guarded.
    pub fn guarded(mut self) -> Self {
        self.guarded = Some(Guarded);
        self
    }

    /// Declare a property.
    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Declare multiple properties.
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = PropertyDef>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Record a property declared by a parent type.
    pub fn with_inherited(mut self, property: PropertyDef) -> Self {
        self.inherited.push(property);
        self
    }

    /// Mix in a shared behaviour.
    pub fn with_mixin(mut self, mixin: Mixin) -> Self {
        self.mixins.push(mixin);
        self
    }

    /// Get an own property by name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The mixin contributing a property of this name, if any.
    pub fn mixin_providing(&self, name: &str) -> Option<&Mixin> {
        self.mixins.iter().find(|m| m.provides(name))
    }
}
