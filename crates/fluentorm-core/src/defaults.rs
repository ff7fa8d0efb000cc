//! Default value seeding.

use crate::discover::ManagedProperty;
use crate::value::{Attributes, Value};

/// Declared property defaults of an entity type, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultSeed {
    values: Attributes,
}

impl DefaultSeed {
    /// Default of a property, if declared.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Number of seeded defaults.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no defaults were declared.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Write the defaults into an initial attribute store.
    ///
    /// Seeded values replace what the store holds for the same key.
    pub fn apply_to(&self, attributes: &mut Attributes) {
        for (name, value) in &self.values {
            attributes.insert(name.clone(), value.clone());
        }
    }
}

/// Collect the declared defaults of the managed properties.
pub fn seed_defaults(properties: &[ManagedProperty]) -> DefaultSeed {
    let values = properties
        .iter()
        .filter_map(|p| p.default.clone().map(|d| (p.name.clone(), d)))
        .collect();

    DefaultSeed { values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes;
    use crate::catalog::{EntitySchema, PropertyDef};
    use crate::discover::discover;

    #[test]
    fn test_seed_only_declared_defaults() {
        let schema = EntitySchema::new("Defaults")
            .with_property(PropertyDef::typed::<i64>("alpha"))
            .with_property(PropertyDef::typed::<i64>("beta").with_default(456))
            .with_property(PropertyDef::typed::<Option<i64>>("gamma").with_default(Value::Null));

        let seed = seed_defaults(&discover(&schema).unwrap());
        assert_eq!(seed.len(), 2);
        assert_eq!(seed.get("alpha"), None);
        assert_eq!(seed.get("beta"), Some(&Value::Int(456)));
        assert_eq!(seed.get("gamma"), Some(&Value::Null));
    }

    #[test]
    fn test_apply_overrides_configured_attributes() {
        let schema = EntitySchema::new("Defaults")
            .with_property(PropertyDef::typed::<String>("status").with_default("draft"));

        let seed = seed_defaults(&discover(&schema).unwrap());
        let mut attributes = attributes! { "alpha" => 123, "status" => "new" };
        seed.apply_to(&mut attributes);

        assert_eq!(attributes["alpha"], Value::Int(123));
        assert_eq!(attributes["status"], Value::from("draft"));
    }

    #[test]
    fn test_empty_seed() {
        let seed = seed_defaults(&[]);
        assert!(seed.is_empty());

        let mut attributes = Attributes::new();
        seed.apply_to(&mut attributes);
        assert!(attributes.is_empty());
    }
}
