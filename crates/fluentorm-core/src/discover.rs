//! Managed property discovery.
//!
//! Decides which of an entity's declared properties are kept in sync with
//! the attribute store.

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::{CastDecl, DeclaredType, EntitySchema, GuardDecl};
use crate::error::{Error, Result};
use crate::value::Value;

/// A property under attribute management.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedProperty {
    /// Property name, unique within the entity.
    pub name: String,
    /// Declared type.
    pub declared_type: DeclaredType,
    /// Declared default value.
    pub default: Option<Value>,
    /// Explicit cast declarations, in declaration order.
    pub casts: Vec<CastDecl>,
    /// Mass-assignment declaration.
    pub guard: Option<GuardDecl>,
}

impl ManagedProperty {
    /// Check if null is an acceptable value.
    pub fn is_nullable(&self) -> bool {
        self.declared_type.allows_null()
    }

    /// Check if the property declares a default.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The cast declaration that takes effect, if any.
    pub fn explicit_cast(&self) -> Option<&CastDecl> {
        self.casts.first()
    }
}

/// Discover the managed properties of an entity, in declaration order.
///
/// A property is managed when it is declared by the entity itself (not
/// inherited, not contributed by a mixin), public, typed, and neither typed
/// as an entity nor marked as a relation.
pub fn discover(schema: &EntitySchema) -> Result<Vec<ManagedProperty>> {
    let mut seen = HashSet::with_capacity(schema.properties.len());
    for property in &schema.properties {
        if !seen.insert(property.name.as_str()) {
            return Err(Error::DuplicateProperty {
                entity: schema.name.clone(),
                property: property.name.clone(),
            });
        }
    }

    let mut managed = Vec::with_capacity(schema.properties.len());

    for property in &schema.properties {
        if !property.is_public() {
            continue;
        }

        if let Some(mixin) = schema.mixin_providing(&property.name) {
            debug!(
                entity = %schema.name,
                property = %property.name,
                mixin = %mixin.name,
                "skipping mixin-provided property"
            );
            continue;
        }

        let Some(declared_type) = &property.declared_type else {
            debug!(
                entity = %schema.name,
                property = %property.name,
                "skipping untyped property"
            );
            continue;
        };

        if property.is_relation() {
            continue;
        }

        managed.push(ManagedProperty {
            name: property.name.clone(),
            declared_type: declared_type.clone(),
            default: property.default.clone(),
            casts: property.casts.clone(),
            guard: property.guard,
        });
    }

    Ok(managed)
}
