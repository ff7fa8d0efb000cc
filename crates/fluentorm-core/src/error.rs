//! Core error types.

use thiserror::Error;

/// Result alias for binding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while compiling entity metadata or synchronizing properties.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A cast declaration does not resolve to a usable type tag.
    #[error("invalid cast on {entity}.{property}: {reason}")]
    InvalidCast {
        entity: String,
        property: String,
        reason: String,
    },

    /// Two properties with the same name were registered on one entity.
    #[error("property {property} is declared more than once on {entity}")]
    DuplicateProperty { entity: String, property: String },

    /// The entity has no typed property with this name.
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// A stored value cannot be represented by the property's Rust type.
    #[error("type mismatch on property {property}: expected {expected}, found {found}")]
    TypeMismatch {
        property: String,
        expected: String,
        found: String,
    },

    /// Mass assignment attempted on a model that guards every attribute.
    #[error("mass assignment of [{key}] rejected on totally guarded entity {entity}")]
    MassAssignment { entity: String, key: String },

    /// Attribute store serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}
