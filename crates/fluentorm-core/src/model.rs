//! The ORM base model interface, plus an in-memory reference implementation.
//!
//! The binding engine never owns persistence: it only needs a model that keeps
//! an attribute store, mass-assignment lists, cast configuration and save
//! bookkeeping. [`BaseModel`] is that contract; [`Model`] implements it without
//! any I/O.

use crate::catalog::GuardedList;
use crate::config::{CastMap, ModelConfig, TimestampColumns};
use crate::error::Result;
use crate::value::{Attributes, Value};

/// The base model the binding engine interposes on.
pub trait BaseModel: Sized {
    /// Build a fresh, non-persisted model from its configuration.
    fn from_config(config: &ModelConfig) -> Self;

    /// The attribute store.
    fn attributes(&self) -> &Attributes;

    /// Mutable access to the attribute store, bypassing casts.
    fn attributes_mut(&mut self) -> &mut Attributes;

    /// Read one attribute.
    fn get_attribute(&self, key: &str) -> Option<Value> {
        self.attributes().get(key).cloned()
    }

    /// Set one attribute, applying the model's write casts.
    fn set_attribute(&mut self, key: &str, value: Value) -> Result<()>;

    /// Replace the whole attribute store. No casts, no checks.
    fn set_raw_attributes(&mut self, attributes: Attributes, sync: bool) -> Result<()> {
        *self.attributes_mut() = attributes;
        if sync {
            self.sync_original();
        }
        Ok(())
    }

    /// Fold values held by custom cast objects back into the attribute store.
    fn merge_attributes_from_class_casts(&mut self) -> Result<()> {
        Ok(())
    }

    /// Fillable attribute list.
    fn fillable(&self) -> &[String];

    /// Mutable fillable attribute list.
    fn fillable_mut(&mut self) -> &mut Vec<String>;

    /// Guarded attribute list.
    fn guarded(&self) -> &GuardedList;

    /// Mutable guarded attribute list.
    fn guarded_mut(&mut self) -> &mut GuardedList;

    /// Cast configuration.
    fn casts(&self) -> &CastMap;

    /// Mutable cast configuration.
    fn casts_mut(&mut self) -> &mut CastMap;

    /// Primary key attribute name.
    fn key_name(&self) -> &str;

    /// Timestamp-role column names.
    fn timestamp_columns(&self) -> &TimestampColumns;

    /// Whether created/updated timestamps are maintained on save.
    fn uses_timestamps(&self) -> bool;

    /// Whether the model is persisted.
    fn exists(&self) -> bool;

    /// Mark the model as persisted or not.
    fn set_exists(&mut self, exists: bool);

    /// Snapshot the current attributes as the original state.
    fn sync_original(&mut self);

    /// Attributes that differ from the original state.
    fn get_dirty(&self) -> Attributes;

    /// Attributes changed by the last save.
    fn get_changes(&self) -> &Attributes;

    /// Bookkeeping after a successful save.
    fn finish_save(&mut self) -> Result<()>;

    /// Plain map representation.
    fn to_map(&self) -> Attributes {
        self.attributes().clone()
    }

    /// Check if an attribute differs from the original state.
    fn is_dirty(&self, key: &str) -> bool {
        self.get_dirty().contains_key(key)
    }

    /// Check if an attribute was changed by the last save.
    fn was_changed(&self, key: &str) -> bool {
        self.get_changes().contains_key(key)
    }

    /// Check if an attribute is guarded.
    fn is_guarded(&self, key: &str) -> bool {
        self.guarded().guards(key)
    }

    /// Check if an attribute may be mass assigned.
    fn is_fillable(&self, key: &str) -> bool {
        if self.fillable().iter().any(|f| f == key) {
            return true;
        }

        if self.is_guarded(key) {
            return false;
        }

        self.fillable().is_empty() && !key.contains('.') && !key.starts_with('_')
    }

    /// Check if nothing may be mass assigned.
    fn totally_guarded(&self) -> bool {
        self.fillable().is_empty() && self.guarded().is_all()
    }

    /// Narrow input attributes to the fillable list, when one is set.
    fn fillable_from_array(&self, attributes: Attributes) -> Attributes {
        let fillable = self.fillable();
        if fillable.is_empty() {
            return attributes;
        }

        attributes
            .into_iter()
            .filter(|(key, _)| fillable.iter().any(|f| f == key))
            .collect()
    }
}

/// In-memory base model.
///
/// Write casts coerce between primitives for the `integer`, `boolean`,
/// `float` and `string` tag families. Every other tag, and any value the
/// coercion cannot convert, is stored as given. A `decimal:N` or `datetime`
/// tag on a float or date property therefore leaves a string input as a
/// string, which the typed property rejects with
/// [`Error::TypeMismatch`](crate::Error::TypeMismatch);
/// [`sync::set_attribute`](crate::sync::set_attribute) then rolls the write back.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    attributes: Attributes,
    original: Attributes,
    changes: Attributes,
    fillable: Vec<String>,
    guarded: GuardedList,
    casts: CastMap,
    primary_key: String,
    timestamps: bool,
    timestamp_columns: TimestampColumns,
    exists: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self::from_config(&ModelConfig::default())
    }
}

impl Model {
    /// The original (last synced) attribute state.
    pub fn original(&self) -> &Attributes {
        &self.original
    }

    fn cast_for_write(&self, key: &str, value: Value) -> Value {
        match self.casts.get(key) {
            Some(tag) => coerce(tag, value),
            None => value,
        }
    }
}

impl BaseModel for Model {
    fn from_config(config: &ModelConfig) -> Self {
        Self {
            attributes: config.attributes.clone(),
            original: Attributes::new(),
            changes: Attributes::new(),
            fillable: config.fillable.clone(),
            guarded: config.guarded.clone(),
            casts: config.casts.clone(),
            primary_key: config.primary_key.clone(),
            timestamps: config.timestamps,
            timestamp_columns: config.timestamp_columns.clone(),
            exists: false,
        }
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    fn set_attribute(&mut self, key: &str, value: Value) -> Result<()> {
        let value = self.cast_for_write(key, value);
        self.attributes.insert(key.to_string(), value);
        Ok(())
    }

    fn fillable(&self) -> &[String] {
        &self.fillable
    }

    fn fillable_mut(&mut self) -> &mut Vec<String> {
        &mut self.fillable
    }

    fn guarded(&self) -> &GuardedList {
        &self.guarded
    }

    fn guarded_mut(&mut self) -> &mut GuardedList {
        &mut self.guarded
    }

    fn casts(&self) -> &CastMap {
        &self.casts
    }

    fn casts_mut(&mut self) -> &mut CastMap {
        &mut self.casts
    }

    fn key_name(&self) -> &str {
        &self.primary_key
    }

    fn timestamp_columns(&self) -> &TimestampColumns {
        &self.timestamp_columns
    }

    fn uses_timestamps(&self) -> bool {
        self.timestamps
    }

    fn exists(&self) -> bool {
        self.exists
    }

    fn set_exists(&mut self, exists: bool) {
        self.exists = exists;
    }

    fn sync_original(&mut self) {
        self.original = self.attributes.clone();
    }

    fn get_dirty(&self) -> Attributes {
        self.attributes
            .iter()
            .filter(|(key, value)| self.original.get(*key) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn get_changes(&self) -> &Attributes {
        &self.changes
    }

    fn finish_save(&mut self) -> Result<()> {
        if self.exists {
            let dirty = self.get_dirty();
            if !dirty.is_empty() {
                self.changes = dirty;
            }
        }

        self.exists = true;
        self.sync_original();
        Ok(())
    }
}

/// Apply a primitive write cast. Values that do not convert pass through.
fn coerce(tag: &str, value: Value) -> Value {
    if value.is_null() {
        return value;
    }

    let family = tag.split(':').next().unwrap_or(tag);

    match family {
        "int" | "integer" => match value {
            Value::Float(f) => Value::Int(f as i64),
            Value::Bool(b) => Value::Int(i64::from(b)),
            Value::String(ref s) => s.trim().parse().map(Value::Int).unwrap_or(value),
            other => other,
        },
        "bool" | "boolean" => match value {
            Value::Int(i) => Value::Bool(i != 0),
            Value::Float(f) => Value::Bool(f != 0.0),
            Value::String(ref s) => match s.trim() {
                "1" | "true" => Value::Bool(true),
                "" | "0" | "false" => Value::Bool(false),
                _ => value,
            },
            other => other,
        },
        "float" | "double" | "real" => match value {
            Value::Int(i) => Value::Float(i as f64),
            Value::String(ref s) => s.trim().parse().map(Value::Float).unwrap_or(value),
            other => other,
        },
        "string" => match value {
            Value::Int(i) => Value::String(i.to_string()),
            Value::Float(f) => Value::String(f.to_string()),
            Value::Bool(b) => Value::String(if b { "1" } else { "" }.to_string()),
            other => other,
        },
        _ => value,
    }
}
