//! Guard compilation: fillable and guarded markers to mass-assignment lists.

use crate::catalog::{EntitySchema, Fillable, GuardDecl, GuardedList};
use crate::config::ModelConfig;
use crate::discover::ManagedProperty;

/// Final mass-assignment lists of an entity type.
///
/// A name is never in both lists, unless `guarded` is [`GuardedList::All`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPolicy {
    /// Fillable attributes, in order, without duplicates.
    pub fillable: Vec<String>,
    /// Guarded attributes.
    pub guarded: GuardedList,
}

impl GuardPolicy {
    /// Create a policy from starting lists.
    pub fn new(fillable: Vec<String>, guarded: GuardedList) -> Self {
        Self { fillable, guarded }
    }

    /// Check if an attribute is listed as fillable.
    pub fn is_fillable(&self, name: &str) -> bool {
        self.fillable.iter().any(|n| n == name)
    }

    /// Add to fillable (if absent) and take it out of guarded.
    fn mark_fillable(&mut self, name: &str) {
        if !self.is_fillable(name) {
            self.fillable.push(name.to_string());
        }
        self.guarded.remove(name);
    }

    /// Take out of fillable and add to guarded (absorbed by the sentinel).
    fn mark_guarded(&mut self, name: &str) {
        if let Some(index) = self.fillable.iter().position(|n| n == name) {
            self.fillable.remove(index);
        }
        self.guarded.push(name);
    }
}

/// Compile the mass-assignment lists of an entity.
///
/// Starts from the lists in the entity's [`ModelConfig`]. A class-level
/// `Guarded` resets guarded to the sentinel. Each managed property is then
/// handled by the first matching rule: property `Guarded`, class `Fillable`
/// (unless excluded), property `Fillable`.
pub fn compile_guards(properties: &[ManagedProperty], schema: &EntitySchema) -> GuardPolicy {
    let config = &schema.config;
    let mut policy = GuardPolicy::new(config.fillable.clone(), config.guarded.clone());

    if schema.guarded.is_some() {
        policy.guarded = GuardedList::All;
    }

    let class_exclusions = schema
        .fillable
        .as_ref()
        .map(|fillable| fillable_exclusions(fillable, config));

    for property in properties {
        let name = property.name.as_str();
        let class_fillable = class_exclusions
            .as_ref()
            .is_some_and(|excluded| !excluded.iter().any(|e| e == name));

        match property.guard {
            Some(GuardDecl::Guarded) => policy.mark_guarded(name),
            _ if class_fillable => policy.mark_fillable(name),
            Some(GuardDecl::Fillable) => policy.mark_fillable(name),
            None => {}
        }
    }

    policy
}

/// Attributes a class-level `Fillable` leaves out.
fn fillable_exclusions(fillable: &Fillable, config: &ModelConfig) -> Vec<String> {
    let mut excluded = Vec::new();

    if !fillable.includes_primary_key() {
        excluded.push(config.primary_key.clone());
    }

    if !fillable.includes_dates() {
        excluded.extend(config.timestamp_columns.names().map(str::to_string));
    }

    excluded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FillableFlags, PropertyDef};
    use crate::discover::discover;

    fn compile(schema: &EntitySchema) -> GuardPolicy {
        let properties = discover(schema).unwrap();
        compile_guards(&properties, schema)
    }

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_fillable_with_all_flags() {
        let schema = EntitySchema::new("AllFillable")
            .with_fillable(Fillable::with_flags(
                FillableFlags::INCLUDE_PRIMARY_KEY | FillableFlags::INCLUDE_DATES,
            ))
            .with_property(PropertyDef::typed::<i64>("id"))
            .with_property(PropertyDef::typed::<String>("foo"))
            .with_property(PropertyDef::typed::<String>("bar"))
            .with_property(PropertyDef::typed::<String>("baz"))
            .with_property(PropertyDef::typed::<chrono::DateTime<chrono::Utc>>("created_at"))
            .with_property(PropertyDef::typed::<chrono::DateTime<chrono::Utc>>("updated_at"));

        let policy = compile(&schema);
        assert_eq!(
            policy.fillable,
            strings(&["id", "foo", "bar", "baz", "created_at", "updated_at"])
        );
        assert_eq!(policy.guarded, GuardedList::All);
    }

    #[test]
    fn test_fillable_without_flags_excludes_key_and_guarded_property() {
        let schema = EntitySchema::new("GuardedWithGuards")
            .with_fillable(Fillable::new())
            .with_property(PropertyDef::typed::<i64>("id"))
            .with_property(PropertyDef::typed::<String>("one"))
            .with_property(PropertyDef::typed::<String>("two"))
            .with_property(PropertyDef::typed::<String>("three").guarded())
            .with_property(PropertyDef::typed::<String>("four"));

        let policy = compile(&schema);
        assert_eq!(policy.fillable, strings(&["one", "two", "four"]));
        assert_eq!(policy.guarded, GuardedList::All);
    }

    #[test]
    fn test_fillable_without_flags_excludes_dates() {
        let schema = EntitySchema::new("Dated")
            .with_fillable(Fillable::new())
            .with_property(PropertyDef::typed::<String>("title"))
            .with_property(PropertyDef::typed::<chrono::DateTime<chrono::Utc>>("created_at"))
            .with_property(PropertyDef::typed::<chrono::DateTime<chrono::Utc>>("updated_at"))
            .with_property(PropertyDef::typed::<Option<chrono::DateTime<chrono::Utc>>>("deleted_at"));

        let policy = compile(&schema);
        assert_eq!(policy.fillable, strings(&["title"]));
    }

    #[test]
    fn test_unguarded_with_guarded_properties() {
        let schema = EntitySchema::new("UnguardedWithGuards")
            .with_config(ModelConfig::new().unguarded())
            .with_property(PropertyDef::typed::<i64>("id"))
            .with_property(PropertyDef::typed::<String>("alpha"))
            .with_property(PropertyDef::typed::<String>("bravo"))
            .with_property(PropertyDef::typed::<String>("charlie").guarded())
            .with_property(PropertyDef::typed::<String>("delta").guarded());

        let policy = compile(&schema);
        assert!(policy.fillable.is_empty());
        assert_eq!(
            policy.guarded,
            GuardedList::Only(strings(&["charlie", "delta"]))
        );
    }

    #[test]
    fn test_class_guarded_keeps_sentinel_with_property_fillable() {
        let schema = EntitySchema::new("Locked")
            .with_config(ModelConfig::new().with_guarded(GuardedList::from_names(["note"])))
            .guarded()
            .with_property(PropertyDef::typed::<String>("note").fillable())
            .with_property(PropertyDef::typed::<String>("secret"));

        let policy = compile(&schema);
        assert_eq!(policy.fillable, strings(&["note"]));
        assert_eq!(policy.guarded, GuardedList::All);
    }

    #[test]
    fn test_property_fillable_removes_from_guarded() {
        let schema = EntitySchema::new("Partial")
            .with_config(
                ModelConfig::new()
                    .with_guarded(GuardedList::from_names(["name", "email", "role"])),
            )
            .with_property(PropertyDef::typed::<String>("email").fillable());

        let policy = compile(&schema);
        assert_eq!(policy.fillable, strings(&["email"]));
        assert_eq!(policy.guarded, GuardedList::from_names(["name", "role"]));
    }

    #[test]
    fn test_property_guarded_beats_class_fillable_with_flags() {
        let schema = EntitySchema::new("Mixed")
            .with_config(ModelConfig::new().with_fillable(["password"]).unguarded())
            .with_fillable(Fillable::with_flags(FillableFlags::INCLUDE_ALL))
            .with_property(PropertyDef::typed::<i64>("id"))
            .with_property(PropertyDef::typed::<String>("password").guarded());

        let policy = compile(&schema);
        assert_eq!(policy.fillable, strings(&["id"]));
        assert_eq!(policy.guarded, GuardedList::from_names(["password"]));
    }

    #[test]
    fn test_no_markers_leaves_lists_untouched() {
        let schema = EntitySchema::new("Plain")
            .with_config(ModelConfig::new().with_fillable(["name"]))
            .with_property(PropertyDef::typed::<String>("name"))
            .with_property(PropertyDef::typed::<String>("other"));

        let policy = compile(&schema);
        assert_eq!(policy.fillable, strings(&["name"]));
        assert_eq!(policy.guarded, GuardedList::All);
    }

    #[test]
    fn test_custom_primary_key_is_excluded() {
        let schema = EntitySchema::new("Keyed")
            .with_config(ModelConfig::new().with_primary_key("uuid"))
            .with_fillable(Fillable::new())
            .with_property(PropertyDef::typed::<i64>("id"))
            .with_property(PropertyDef::typed::<String>("uuid"));

        let policy = compile(&schema);
        assert_eq!(policy.fillable, strings(&["id"]));
    }
}
