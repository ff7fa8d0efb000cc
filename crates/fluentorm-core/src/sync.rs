//! Property/attribute synchronization.
//!
//! The hooks in this module keep an entity's typed [`Slot`](crate::Slot)
//! properties and its base model's attribute store consistent across the
//! model lifecycle: construction, retrieval, bulk replacement, single
//! attribute writes, cast merging and save.
//!
//! Typed properties are the source of truth. Every read of the attribute
//! store through an entity first pushes initialized properties back into the
//! store, so a direct slot write is visible to serialization, dirty tracking
//! and save without an eager attribute write.

use std::any::TypeId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::trace;

use crate::catalog::EntitySchema;
use crate::config::CastMap;
use crate::discover::ManagedProperty;
use crate::error::{Error, Result};
use crate::model::BaseModel;
use crate::registry::{CompiledSchema, SchemaRegistry};
use crate::slot::Properties;
use crate::value::{Attributes, Value};

/// Per-instance binding state: the compiled schema and the reentrancy flag.
#[derive(Debug)]
pub struct Bindings {
    schema: Arc<CompiledSchema>,
    suppressed: Arc<AtomicBool>,
}

impl Bindings {
    /// Create bindings for a compiled schema.
    pub fn new(schema: Arc<CompiledSchema>) -> Self {
        Self {
            schema,
            suppressed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The compiled schema of the entity type.
    pub fn schema(&self) -> &Arc<CompiledSchema> {
        &self.schema
    }

    /// Check if attribute writes are currently suppressed.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed.load(Ordering::SeqCst)
    }

    /// Suppress attribute writes until the returned guard is dropped.
    pub fn suppress(&self) -> Suppression {
        let previous = self.suppressed.swap(true, Ordering::SeqCst);
        Suppression {
            flag: Arc::clone(&self.suppressed),
            previous,
        }
    }
}

impl Clone for Bindings {
    /// Clones share the compiled schema but get their own flag.
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.schema))
    }
}

/// Scoped suppression of attribute writes. Restores the previous state on drop.
#[must_use = "suppression ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct Suppression {
    flag: Arc<AtomicBool>,
    previous: bool,
}

impl Drop for Suppression {
    fn drop(&mut self) {
        self.flag.store(self.previous, Ordering::SeqCst);
    }
}

/// A managed property and whether it currently holds a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyState {
    /// Property name.
    pub name: String,
    /// Whether the property is initialized.
    pub initialized: bool,
}

/// An entity whose typed properties are bound to a base model's attributes.
///
/// Implementors provide the registration ([`Fluent::schema`]) and access to
/// their parts; the lifecycle operations are provided.
pub trait Fluent: Properties + Sized + 'static {
    /// The base model type.
    type Base: BaseModel;

    /// Declarative registration of the entity. Called once per process.
    fn schema() -> EntitySchema;

    /// Assemble an entity with every property unset.
    fn from_parts(base: Self::Base, bindings: Bindings) -> Self;

    /// The base model.
    fn base(&self) -> &Self::Base;

    /// Mutable access to the base model.
    fn base_mut(&mut self) -> &mut Self::Base;

    /// The binding state.
    fn bindings(&self) -> &Bindings;

    /// The compiled schema of this entity type.
    fn compiled() -> Result<Arc<CompiledSchema>> {
        SchemaRegistry::global().get_or_compile(TypeId::of::<Self>(), Self::schema)
    }

    /// Construct a new entity, mass assigning `attributes`.
    fn new(attributes: Attributes) -> Result<Self> {
        construct(attributes)
    }

    /// Construct a new entity without attributes.
    fn make() -> Result<Self> {
        construct(Attributes::new())
    }

    /// Build an entity from a stored record.
    fn new_from_builder(attributes: Attributes) -> Result<Self> {
        new_from_builder(attributes)
    }

    /// Construct and save a new entity.
    fn create(attributes: Attributes) -> Result<Self> {
        let mut entity = construct(attributes)?;
        save(&mut entity)?;
        Ok(entity)
    }

    /// Mass assign attributes.
    fn fill(&mut self, attributes: Attributes) -> Result<&mut Self> {
        fill(self, attributes)?;
        Ok(self)
    }

    /// Mass assign attributes and save.
    fn update(&mut self, attributes: Attributes) -> Result<()> {
        fill(self, attributes)?;
        save(self)
    }

    /// Save the entity.
    fn save(&mut self) -> Result<()> {
        save(self)
    }

    /// Reload the entity from a freshly fetched record.
    fn refresh(&mut self, attributes: Attributes) -> Result<&mut Self> {
        set_raw_attributes(self, attributes, true)?;
        Ok(self)
    }

    /// Set one attribute.
    fn set_attribute(&mut self, key: &str, value: impl Into<Value>) -> Result<&mut Self> {
        set_attribute(self, key, value.into())?;
        Ok(self)
    }

    /// Replace the attribute store.
    fn set_raw_attributes(&mut self, attributes: Attributes, sync: bool) -> Result<&mut Self> {
        set_raw_attributes(self, attributes, sync)?;
        Ok(self)
    }

    /// Push initialized properties into the attribute store.
    fn merge_attributes_from_class_casts(&mut self) -> Result<()> {
        merge_attributes_from_class_casts(self)
    }

    /// Populate properties from the attribute store.
    fn hydrate(&mut self) -> Result<()> {
        hydrate(self)
    }

    /// Post-retrieval hook.
    fn retrieved(&mut self) -> Result<()> {
        retrieved(self)
    }

    /// Write a property and the matching attribute.
    fn assign_property(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        assign_property(self, name, value.into())?;
        Ok(self)
    }

    /// Managed properties in declaration order, with their initialization state.
    fn managed_properties(&self) -> Result<Vec<PropertyState>> {
        managed_properties(self)
    }

    /// Read one attribute.
    fn get_attribute(&mut self, key: &str) -> Result<Option<Value>> {
        merge_attributes_from_class_casts(self)?;
        Ok(self.base().get_attribute(key))
    }

    /// The attribute store.
    fn get_attributes(&mut self) -> Result<Attributes> {
        merge_attributes_from_class_casts(self)?;
        Ok(self.base().attributes().clone())
    }

    /// Attributes that differ from the original state.
    fn get_dirty(&mut self) -> Result<Attributes> {
        merge_attributes_from_class_casts(self)?;
        Ok(self.base().get_dirty())
    }

    /// Attributes changed by the last save.
    fn get_changes(&self) -> Attributes {
        self.base().get_changes().clone()
    }

    /// Check if an attribute was changed by the last save.
    fn was_changed(&self, key: &str) -> bool {
        self.base().was_changed(key)
    }

    /// Plain map representation.
    fn to_map(&mut self) -> Result<Attributes> {
        merge_attributes_from_class_casts(self)?;
        Ok(self.base().to_map())
    }

    /// JSON representation.
    fn to_json(&mut self) -> Result<serde_json::Value> {
        let map = self.to_map()?;
        serde_json::to_value(&map).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Fillable attribute list.
    fn get_fillable(&self) -> Vec<String> {
        self.base().fillable().to_vec()
    }

    /// Guarded attribute list, `["*"]` when everything is guarded.
    fn get_guarded(&self) -> Vec<String> {
        self.base().guarded().to_names()
    }

    /// Cast configuration.
    fn get_casts(&self) -> CastMap {
        self.base().casts().clone()
    }
}

/// Construction hook.
///
/// Installs the compiled guards and casts on a fresh base model, seeds
/// defaults into its attribute store, mass assigns `attributes` on top and
/// hydrates. Fails with [`Error::UnknownProperty`] if a managed property has
/// no bound slot.
pub fn construct<E: Fluent>(attributes: Attributes) -> Result<E> {
    let schema = E::compiled()?;

    let mut base = E::Base::from_config(&schema.config);
    *base.fillable_mut() = schema.guards.fillable.clone();
    *base.guarded_mut() = schema.guards.guarded.clone();
    schema.casts.merge_into(base.casts_mut());
    schema.defaults.apply_to(base.attributes_mut());
    base.sync_original();

    let mut entity = E::from_parts(base, Bindings::new(Arc::clone(&schema)));
    for property in schema.properties() {
        entity.is_property_set(&property.name)?;
    }

    fill(&mut entity, attributes)?;
    hydrate(&mut entity)?;

    Ok(entity)
}

/// Retrieval: build an empty entity, load a stored record and rehydrate.
pub fn new_from_builder<E: Fluent>(attributes: Attributes) -> Result<E> {
    let mut entity = construct::<E>(Attributes::new())?;
    entity.base_mut().set_exists(true);
    set_raw_attributes(&mut entity, attributes, true)?;
    retrieved(&mut entity)?;
    Ok(entity)
}

/// Populate every managed property present in the attribute store.
pub fn hydrate<E: Fluent>(entity: &mut E) -> Result<()> {
    let schema = Arc::clone(entity.bindings().schema());

    for property in schema.properties() {
        if !entity.base().attributes().contains_key(&property.name) {
            continue;
        }

        let value = entity.base().get_attribute(&property.name).unwrap_or(Value::Null);
        assign_managed(entity, property, value)?;
    }

    Ok(())
}

/// Post-retrieval hook.
pub fn retrieved<E: Fluent>(entity: &mut E) -> Result<()> {
    hydrate(entity)
}

/// Bulk raw-attribute replacement.
///
/// Every property is cleared before the base store is replaced. Properties
/// whose key is present in the new store are then reassigned from it with
/// attribute writes suppressed; the rest stay unset.
pub fn set_raw_attributes<E: Fluent>(
    entity: &mut E,
    attributes: Attributes,
    sync: bool,
) -> Result<()> {
    let schema = Arc::clone(entity.bindings().schema());

    for property in schema.properties() {
        if entity.is_property_set(&property.name)? {
            entity.clear_property(&property.name)?;
        }
    }

    entity.base_mut().set_raw_attributes(attributes, sync)?;

    let _suppression = entity.bindings().suppress();
    for property in schema.properties() {
        if !entity.base().attributes().contains_key(&property.name) {
            continue;
        }

        let value = entity.base().get_attribute(&property.name).unwrap_or(Value::Null);
        assign_managed(entity, property, value)?;
    }

    Ok(())
}

/// Single attribute write.
///
/// A no-op while writes are suppressed. Otherwise the base model stores the
/// value (applying its casts) and a managed property takes the stored result.
/// If the property cannot hold the stored result, both the attribute and the
/// property are restored to their previous state before the error returns.
pub fn set_attribute<E: Fluent>(entity: &mut E, key: &str, value: Value) -> Result<()> {
    if entity.bindings().is_suppressed() {
        trace!(key, "attribute write suppressed");
        return Ok(());
    }

    let schema = Arc::clone(entity.bindings().schema());
    let Some(property) = schema.property(key) else {
        return entity.base_mut().set_attribute(key, value);
    };

    let previous_property = entity.read_property(key)?;
    let previous_attribute = entity.base().attributes().get(key).cloned();

    entity.clear_property(key)?;
    entity.base_mut().set_attribute(key, value)?;

    let stored = entity.base().get_attribute(key).unwrap_or(Value::Null);
    if let Err(err) = assign_managed(entity, property, stored) {
        trace!(key, error = %err, "rolling back attribute write");
        match previous_attribute {
            Some(previous) => {
                entity.base_mut().attributes_mut().insert(key.to_string(), previous);
            }
            None => {
                entity.base_mut().attributes_mut().shift_remove(key);
            }
        }
        if let Some(previous) = previous_property {
            entity.write_property(key, previous)?;
        }
        return Err(err);
    }

    Ok(())
}

/// Push every initialized managed property into the attribute store, then let
/// the base model merge its own cast objects.
pub fn merge_attributes_from_class_casts<E: Fluent>(entity: &mut E) -> Result<()> {
    let schema = Arc::clone(entity.bindings().schema());

    for property in schema.properties() {
        if let Some(value) = entity.read_property(&property.name)? {
            entity.base_mut().set_attribute(&property.name, value)?;
        }
    }

    entity.base_mut().merge_attributes_from_class_casts()
}

/// Write-through property assignment.
pub fn assign_property<E: Fluent>(entity: &mut E, name: &str, value: Value) -> Result<()> {
    entity.write_property(name, value.clone())?;

    if entity.bindings().schema().is_managed(name) {
        set_attribute(entity, name, value)?;
    }

    Ok(())
}

/// Mass assignment.
///
/// Keys outside the fillable list are dropped, unless the model guards
/// everything, in which case the first such key is rejected.
pub fn fill<E: Fluent>(entity: &mut E, attributes: Attributes) -> Result<()> {
    let totally_guarded = entity.base().totally_guarded();
    let attributes = entity.base().fillable_from_array(attributes);

    for (key, value) in attributes {
        if entity.base().is_fillable(&key) {
            set_attribute(entity, &key, value)?;
        } else if totally_guarded {
            return Err(Error::MassAssignment {
                entity: entity.bindings().schema().entity.clone(),
                key,
            });
        } else {
            trace!(key = %key, "discarding non-fillable attribute");
        }
    }

    Ok(())
}

/// Save: merge properties, touch timestamps, then base save bookkeeping.
pub fn save<E: Fluent>(entity: &mut E) -> Result<()> {
    merge_attributes_from_class_casts(entity)?;

    let exists = entity.base().exists();
    let dirty = !entity.base().get_dirty().is_empty();

    if entity.base().uses_timestamps() && (!exists || dirty) {
        touch_timestamps(entity, exists)?;
    }

    entity.base_mut().finish_save()
}

/// Managed properties with their initialization state.
pub fn managed_properties<E: Fluent>(entity: &E) -> Result<Vec<PropertyState>> {
    entity
        .bindings()
        .schema()
        .properties()
        .iter()
        .map(|p| {
            Ok(PropertyState {
                name: p.name.clone(),
                initialized: entity.is_property_set(&p.name)?,
            })
        })
        .collect()
}

fn touch_timestamps<E: Fluent>(entity: &mut E, exists: bool) -> Result<()> {
    let now = Value::DateTime(Utc::now());
    let columns = entity.base().timestamp_columns().clone();

    if let Some(updated_at) = &columns.updated_at {
        if !entity.base().is_dirty(updated_at) {
            set_attribute(entity, updated_at, now.clone())?;
        }
    }

    if !exists {
        if let Some(created_at) = &columns.created_at {
            if !entity.base().is_dirty(created_at) {
                set_attribute(entity, created_at, now)?;
            }
        }
    }

    Ok(())
}

/// Assign a stored value to a managed property.
///
/// Returns `false` when a null was withheld from a non-nullable property.
fn assign_managed<E: Fluent>(
    entity: &mut E,
    property: &ManagedProperty,
    value: Value,
) -> Result<bool> {
    if value.is_null() && !property.is_nullable() {
        trace!(
            property = %property.name,
            declared = %property.declared_type,
            "leaving non-nullable property unset for null attribute"
        );
        return Ok(false);
    }

    entity.write_property(&property.name, value)?;
    Ok(true)
}
