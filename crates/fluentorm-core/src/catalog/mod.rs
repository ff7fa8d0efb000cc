//! Declarative entity metadata.
//!
//! The catalog holds the typed declarations an entity registers: its
//! properties and their types, casts, mass-assignment markers and relation
//! markers, plus the mixins it uses.

mod cast;
mod entity;
mod guard;
mod property;
mod relation;
mod types;

pub use cast::CastDecl;
pub use entity::{EntitySchema, Mixin};
pub use guard::{Fillable, FillableFlags, GuardDecl, Guarded, GuardedList};
pub use property::{PropertyDef, Visibility};
pub use relation::{RelationDecl, RelationKind};
pub use types::{DeclaredType, Primitive, PropertyValue, TypeKind};
