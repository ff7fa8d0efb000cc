//! Per-entity-type memoization of compiled bindings.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use tracing::debug;

use crate::casts::{compile_casts, CastPolicy};
use crate::catalog::EntitySchema;
use crate::config::ModelConfig;
use crate::defaults::{seed_defaults, DefaultSeed};
use crate::discover::{discover, ManagedProperty};
use crate::error::Result;
use crate::guards::{compile_guards, GuardPolicy};

/// Everything derived from an entity's registration, computed once per type.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchema {
    /// Entity name.
    pub entity: String,
    /// Base model configuration.
    pub config: ModelConfig,
    /// Managed properties, in declaration order.
    pub properties: Vec<ManagedProperty>,
    /// Mass-assignment lists.
    pub guards: GuardPolicy,
    /// Compiled casts.
    pub casts: CastPolicy,
    /// Declared defaults.
    pub defaults: DefaultSeed,
    positions: HashMap<String, usize>,
}

impl CompiledSchema {
    /// Compile an entity registration.
    ///
    /// Configuration errors (duplicate properties, malformed casts) surface
    /// here.
    pub fn compile(schema: EntitySchema) -> Result<Self> {
        let properties = discover(&schema)?;
        let guards = compile_guards(&properties, &schema);
        let casts = compile_casts(&schema.name, &properties, &schema.config)?;
        let defaults = seed_defaults(&properties);

        let positions = properties
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();

        debug!(
            entity = %schema.name,
            properties = properties.len(),
            fillable = guards.fillable.len(),
            guarded_all = guards.guarded.is_all(),
            casts = casts.len(),
            defaults = defaults.len(),
            "compiled entity bindings"
        );

        Ok(Self {
            entity: schema.name,
            config: schema.config,
            properties,
            guards,
            casts,
            defaults,
            positions,
        })
    }

    /// Managed properties, in declaration order.
    pub fn properties(&self) -> &[ManagedProperty] {
        &self.properties
    }

    /// Look up a managed property.
    pub fn property(&self, name: &str) -> Option<&ManagedProperty> {
        self.positions.get(name).map(|&i| &self.properties[i])
    }

    /// Check if a name is a managed property.
    pub fn is_managed(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }
}

/// Registry of compiled schemas, keyed by entity type.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: DashMap<TypeId, Arc<CompiledSchema>>,
}

static GLOBAL: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::new);

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            schemas: DashMap::new(),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static SchemaRegistry {
        &GLOBAL
    }

    /// Get the compiled schema of a type, compiling it on first use.
    ///
    /// Compilation runs outside the map's locks. When two callers race, both
    /// compile and the first insert is kept. Failures are not cached.
    pub fn get_or_compile(
        &self,
        type_id: TypeId,
        schema: impl FnOnce() -> EntitySchema,
    ) -> Result<Arc<CompiledSchema>> {
        if let Some(entry) = self.schemas.get(&type_id) {
            return Ok(entry.clone());
        }

        let compiled = Arc::new(CompiledSchema::compile(schema())?);
        let entry = self.schemas.entry(type_id).or_insert(compiled);
        Ok(entry.clone())
    }

    /// Get an already compiled schema.
    pub fn get(&self, type_id: TypeId) -> Option<Arc<CompiledSchema>> {
        self.schemas.get(&type_id).map(|entry| entry.clone())
    }

    /// Number of compiled entity types.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if nothing has been compiled.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CastDecl, PropertyDef};
    use crate::error::Error;

    struct Widget;
    struct Broken;

    fn widget_schema() -> EntitySchema {
        EntitySchema::new("Widget")
            .with_property(PropertyDef::typed::<i64>("id"))
            .with_property(PropertyDef::typed::<String>("name").fillable())
            .with_property(PropertyDef::typed::<i64>("stock").with_default(0))
    }

    #[test]
    fn test_compile_schema() {
        let compiled = CompiledSchema::compile(widget_schema()).unwrap();
        assert_eq!(compiled.entity, "Widget");
        assert_eq!(compiled.properties().len(), 3);
        assert!(compiled.is_managed("stock"));
        assert!(!compiled.is_managed("missing"));
        assert_eq!(compiled.property("name").map(|p| p.name.as_str()), Some("name"));
        assert_eq!(compiled.guards.fillable, vec!["name".to_string()]);
        assert_eq!(compiled.casts.get("stock"), Some("integer"));
        assert!(compiled.defaults.get("stock").is_some());
    }

    #[test]
    fn test_compiles_once_per_type() {
        let registry = SchemaRegistry::new();
        let first = registry
            .get_or_compile(TypeId::of::<Widget>(), widget_schema)
            .unwrap();
        let second = registry
            .get_or_compile(TypeId::of::<Widget>(), || {
                panic!("schema must not be rebuilt")
            })
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let registry = SchemaRegistry::new();
        let broken = || {
            EntitySchema::new("Broken")
                .with_property(PropertyDef::typed::<String>("code").with_cast(CastDecl::cast("")))
        };

        let err = registry
            .get_or_compile(TypeId::of::<Broken>(), broken)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCast { .. }));
        assert!(registry.is_empty());
        assert!(registry.get(TypeId::of::<Broken>()).is_none());
    }
}
