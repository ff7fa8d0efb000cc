//! Property declarations for entities.

use super::cast::CastDecl;
use super::guard::GuardDecl;
use super::relation::RelationDecl;
use super::types::{DeclaredType, PropertyValue};
use crate::value::Value;

/// Visibility of a declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Visibility {
    /// Accessible to callers; candidate for attribute management.
    #[default]
    Public,
    /// Internal to the entity and its extensions.
    Protected,
    /// Internal to the entity.
    Private,
}

/// A property declared on an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    /// Property name.
    pub name: String,
    /// Property visibility.
    pub visibility: Visibility,
    /// Declared type, if any.
    pub declared_type: Option<DeclaredType>,
    /// Declared default value.
    pub default: Option<Value>,
    /// Explicit cast declarations, in declaration order.
    pub casts: Vec<CastDecl>,
    /// Mass-assignment declaration.
    pub guard: Option<GuardDecl>,
    /// Relation marker.
    pub relation: Option<RelationDecl>,
}

impl PropertyDef {
    /// Create a public property with the given declared type.
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            declared_type: Some(declared_type),
            default: None,
            casts: Vec::new(),
            guard: None,
            relation: None,
        }
    }

    /// Create a public property typed after a Rust type.
    pub fn typed<T: PropertyValue>(name: impl Into<String>) -> Self {
        Self::new(name, T::declared_type())
    }

    /// Create a public property without a declared type.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            declared_type: None,
            ..Self::new(name, DeclaredType::of::<String>())
        }
    }

    /// Create a property referencing another entity.
    pub fn entity(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::entity(entity))
    }

    /// Mark as protected.
    pub fn protected(mut self) -> Self {
        self.visibility = Visibility::Protected;
        self
    }

    /// Mark as private.
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Add an explicit cast declaration.
    pub fn with_cast(mut self, cast: CastDecl) -> Self {
        self.casts.push(cast);
        self
    }

    /// Mark as fillable.
    pub fn fillable(mut self) -> Self {
        self.guard = Some(GuardDecl::Fillable);
        self
    }

    /// Mark as guarded.
    pub fn guarded(mut self) -> Self {
        self.guard = Some(GuardDecl::Guarded);
        self
    }

    /// Attach a relation marker.
    pub fn with_relation(mut self, relation: RelationDecl) -> Self {
        self.relation = Some(relation);
        self
    }

    /// Check if the property is public.
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Check if the property has a declared type.
    pub fn is_typed(&self) -> bool {
        self.declared_type.is_some()
    }

    /// Check if this property has a default value.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Check if the property represents a relation, by type or by marker.
    pub fn is_relation(&self) -> bool {
        self.relation.is_some()
            || self
                .declared_type
                .as_ref()
                .is_some_and(DeclaredType::is_entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_def_builder() {
        let property = PropertyDef::typed::<String>("price")
            .with_cast(CastDecl::as_decimal())
            .with_default("0.00")
            .fillable();

        assert_eq!(property.name, "price");
        assert!(property.is_public());
        assert!(property.is_typed());
        assert!(property.has_default());
        assert_eq!(property.casts.len(), 1);
        assert_eq!(property.guard, Some(GuardDecl::Fillable));
        assert!(!property.is_relation());
    }

    #[test]
    fn test_untyped_and_hidden_properties() {
        assert!(!PropertyDef::untyped("loose").is_typed());
        assert!(!PropertyDef::typed::<i64>("secret").private().is_public());
        assert!(!PropertyDef::typed::<i64>("internal").protected().is_public());
    }

    #[test]
    fn test_relation_detection() {
        assert!(PropertyDef::entity("category", "Category").is_relation());
        assert!(PropertyDef::typed::<Vec<i64>>("features")
            .with_relation(RelationDecl::has_many("Feature"))
            .is_relation());
        assert!(PropertyDef::untyped("owner")
            .with_relation(RelationDecl::belongs_to())
            .is_relation());
    }
}
