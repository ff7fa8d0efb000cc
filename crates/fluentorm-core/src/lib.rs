//! fluentorm core - typed property bindings over an ORM base model.
//!
//! An entity declares its persisted fields as [`Slot`] properties and
//! registers an [`EntitySchema`] describing their types, casts,
//! mass-assignment markers, relation markers and defaults. The crate compiles
//! that registration once per entity type and keeps the typed properties and
//! the base model's attribute store synchronized through the [`Fluent`]
//! lifecycle hooks.

pub mod casts;
pub mod catalog;
pub mod config;
pub mod defaults;
pub mod discover;
pub mod error;
pub mod guards;
pub mod model;
pub mod registry;
pub mod slot;
pub mod sync;
pub mod value;

pub use casts::{compile_casts, CastPolicy};
pub use catalog::{
    CastDecl, DeclaredType, EntitySchema, Fillable, FillableFlags, GuardDecl, Guarded,
    GuardedList, Mixin, Primitive, PropertyDef, PropertyValue, RelationDecl, RelationKind,
    TypeKind, Visibility,
};
pub use config::{CastMap, ModelConfig, TimestampColumns};
pub use defaults::{seed_defaults, DefaultSeed};
pub use discover::{discover, ManagedProperty};
pub use error::{Error, Result};
pub use guards::{compile_guards, GuardPolicy};
pub use model::{BaseModel, Model};
pub use registry::{CompiledSchema, SchemaRegistry};
pub use slot::{Properties, Slot};
pub use sync::{Bindings, Fluent, PropertyState, Suppression};
pub use value::{Attributes, Value};
