//! Cast compilation: declared types and cast declarations to type tags.

use crate::config::{CastMap, ModelConfig};
use crate::discover::ManagedProperty;
use crate::error::{Error, Result};

/// Compiled cast configuration of an entity type: property name to type tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CastPolicy {
    casts: CastMap,
}

impl CastPolicy {
    /// Type tag of a property, if it has one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.casts.get(name).map(String::as_str)
    }

    /// Number of compiled casts.
    pub fn len(&self) -> usize {
        self.casts.len()
    }

    /// Check if no casts were compiled.
    pub fn is_empty(&self) -> bool {
        self.casts.is_empty()
    }

    /// Iterate over `(property, type tag)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.casts.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Layer the compiled casts on top of an existing cast configuration.
    pub fn merge_into(&self, target: &mut CastMap) {
        for (name, tag) in &self.casts {
            target.insert(name.clone(), tag.clone());
        }
    }
}

/// Compile the cast configuration of an entity.
///
/// Timestamp-role properties are skipped; the base model casts them itself.
/// The first explicit cast declaration of a property wins over the tag
/// inferred from its declared type.
pub fn compile_casts(
    entity: &str,
    properties: &[ManagedProperty],
    config: &ModelConfig,
) -> Result<CastPolicy> {
    let mut casts = CastMap::with_capacity(properties.len());

    for property in properties {
        if config.timestamp_columns.contains(&property.name) {
            continue;
        }

        let tag = match property.explicit_cast() {
            Some(cast) => cast.resolve().map_err(|reason| Error::InvalidCast {
                entity: entity.to_string(),
                property: property.name.clone(),
                reason,
            })?,
            None => property.declared_type.native_cast(),
        };

        casts.insert(property.name.clone(), tag);
    }

    Ok(CastPolicy { casts })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::catalog::{CastDecl, DeclaredType, EntitySchema, PropertyDef, TypeKind};
    use crate::config::TimestampColumns;
    use crate::discover::discover;

    fn compile(schema: &EntitySchema) -> Result<CastPolicy> {
        let properties = discover(schema)?;
        compile_casts(&schema.name, &properties, &schema.config)
    }

    #[test]
    fn test_native_inference() {
        let schema = EntitySchema::new("Native")
            .with_property(PropertyDef::typed::<i64>("id"))
            .with_property(PropertyDef::typed::<bool>("active"))
            .with_property(PropertyDef::typed::<String>("name"))
            .with_property(PropertyDef::typed::<f64>("ratio"))
            .with_property(PropertyDef::typed::<Vec<String>>("tags"))
            .with_property(PropertyDef::typed::<Option<DateTime<Utc>>>("published_at"))
            .with_property(PropertyDef::new(
                "price",
                DeclaredType::new(TypeKind::Value("Money".into())),
            ));

        let casts = compile(&schema).unwrap();
        let pairs: Vec<_> = casts.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("id", "integer"),
                ("active", "boolean"),
                ("name", "string"),
                ("ratio", "float"),
                ("tags", "collection"),
                ("published_at", "datetime"),
                ("price", "Money"),
            ]
        );
    }

    #[test]
    fn test_explicit_cast_wins() {
        let schema = EntitySchema::new("Explicit")
            .with_property(
                PropertyDef::typed::<f64>("total")
                    .with_cast(CastDecl::as_decimal())
                    .with_cast(CastDecl::cast("string")),
            )
            .with_property(
                PropertyDef::typed::<String>("shipped_on").with_cast(CastDecl::as_date_with("Y-m-d")),
            )
            .with_property(PropertyDef::typed::<Vec<i64>>("meta").with_cast(CastDecl::cast("array")));

        let casts = compile(&schema).unwrap();
        assert_eq!(casts.get("total"), Some("decimal:2"));
        assert_eq!(casts.get("shipped_on"), Some("datetime:Y-m-d"));
        assert_eq!(casts.get("meta"), Some("array"));
    }

    #[test]
    fn test_timestamp_roles_are_skipped() {
        let schema = EntitySchema::new("Stamped")
            .with_property(PropertyDef::typed::<String>("title"))
            .with_property(PropertyDef::typed::<DateTime<Utc>>("created_at"))
            .with_property(
                PropertyDef::typed::<DateTime<Utc>>("updated_at").with_cast(CastDecl::as_date()),
            )
            .with_property(PropertyDef::typed::<Option<DateTime<Utc>>>("deleted_at"));

        let casts = compile(&schema).unwrap();
        assert_eq!(casts.len(), 1);
        assert_eq!(casts.get("title"), Some("string"));
        assert_eq!(casts.get("created_at"), None);
    }

    #[test]
    fn test_disabled_role_is_cast_normally() {
        let schema = EntitySchema::new("NoSoftDelete")
            .with_config(ModelConfig::new().with_timestamp_columns(TimestampColumns {
                deleted_at: None,
                ..TimestampColumns::default()
            }))
            .with_property(PropertyDef::typed::<Option<DateTime<Utc>>>("deleted_at"));

        let casts = compile(&schema).unwrap();
        assert_eq!(casts.get("deleted_at"), Some("datetime"));
    }

    #[test]
    fn test_invalid_cast_is_a_configuration_error() {
        let schema = EntitySchema::new("Broken")
            .with_property(PropertyDef::typed::<String>("code").with_cast(CastDecl::cast("  ")));

        let err = compile(&schema).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidCast { ref entity, ref property, .. }
                if entity == "Broken" && property == "code"
        ));
    }

    #[test]
    fn test_merge_into_existing_casts() {
        let schema = EntitySchema::new("Merged")
            .with_property(PropertyDef::typed::<i64>("stock"))
            .with_property(PropertyDef::typed::<bool>("visible"));

        let casts = compile(&schema).unwrap();
        let mut existing = CastMap::new();
        existing.insert("options".into(), "array".into());
        existing.insert("stock".into(), "string".into());
        casts.merge_into(&mut existing);

        assert_eq!(existing.len(), 3);
        assert_eq!(existing.get("options").map(String::as_str), Some("array"));
        assert_eq!(existing.get("stock").map(String::as_str), Some("integer"));
        assert_eq!(existing.get("visible").map(String::as_str), Some("boolean"));
    }
}
