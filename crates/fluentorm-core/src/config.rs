//! Base model configuration.

use indexmap::IndexMap;

use crate::catalog::GuardedList;
use crate::value::{Attributes, Value};

/// Default primary key attribute.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Default created-at column.
pub const DEFAULT_CREATED_AT: &str = "created_at";

/// Default updated-at column.
pub const DEFAULT_UPDATED_AT: &str = "updated_at";

/// Default soft-delete column.
pub const DEFAULT_DELETED_AT: &str = "deleted_at";

/// Cast configuration: attribute name to cast type tag.
pub type CastMap = IndexMap<String, String>;

/// Names of the timestamp-role columns. `None` disables a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampColumns {
    /// Creation timestamp column.
    pub created_at: Option<String>,
    /// Last update timestamp column.
    pub updated_at: Option<String>,
    /// Soft-delete timestamp column.
    pub deleted_at: Option<String>,
}

impl Default for TimestampColumns {
    fn default() -> Self {
        Self {
            created_at: Some(DEFAULT_CREATED_AT.to_string()),
            updated_at: Some(DEFAULT_UPDATED_AT.to_string()),
            deleted_at: Some(DEFAULT_DELETED_AT.to_string()),
        }
    }
}

impl TimestampColumns {
    /// All enabled timestamp-role column names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [&self.created_at, &self.updated_at, &self.deleted_at]
            .into_iter()
            .filter_map(|c| c.as_deref())
    }

    /// Check if a name plays a timestamp role.
    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}

/// Per-entity base model configuration.
///
/// Holds the settings the base model starts from before property bindings
/// are compiled onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Primary key attribute name.
    pub primary_key: String,

    /// Whether the model maintains created/updated timestamps on save.
    pub timestamps: bool,

    /// Timestamp-role column names.
    pub timestamp_columns: TimestampColumns,

    /// Initially fillable attributes.
    pub fillable: Vec<String>,

    /// Initially guarded attributes.
    pub guarded: GuardedList,

    /// Initial cast configuration.
    pub casts: CastMap,

    /// Initial attribute values of a fresh model.
    pub attributes: Attributes,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            timestamps: true,
            timestamp_columns: TimestampColumns::default(),
            fillable: Vec::new(),
            guarded: GuardedList::All,
            casts: CastMap::new(),
            attributes: Attributes::new(),
        }
    }
}

impl ModelConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary key attribute.
    pub fn with_primary_key(mut self, key: impl Into<String>) -> Self {
        self.primary_key = key.into();
        self
    }

    /// Enable or disable automatic timestamps.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Set the timestamp-role column names.
    pub fn with_timestamp_columns(mut self, columns: TimestampColumns) -> Self {
        self.timestamp_columns = columns;
        self
    }

    /// Set the initially fillable attributes.
    pub fn with_fillable(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fillable = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the initially guarded attributes.
    pub fn with_guarded(mut self, guarded: GuardedList) -> Self {
        self.guarded = guarded;
        self
    }

    /// Guard nothing initially.
    pub fn unguarded(self) -> Self {
        self.with_guarded(GuardedList::none())
    }

    /// Add an initial cast.
    pub fn with_cast(mut self, attribute: impl Into<String>, type_tag: impl Into<String>) -> Self {
        self.casts.insert(attribute.into(), type_tag.into());
        self
    }

    /// Add an initial attribute value.
    pub fn with_attribute(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(attribute.into(), value.into());
        self
    }
}
