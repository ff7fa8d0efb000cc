//! Declared property types and their mapping to Rust types.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::value::Value;

/// Primitive scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Boolean value.
    Bool,
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// UTF-8 string.
    String,
}

/// Kind of a declared property type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A primitive scalar.
    Primitive(Primitive),
    /// An ordered collection of values.
    Collection,
    /// A point in time.
    DateTime,
    /// Any other structured value type, identified by name.
    Value(String),
    /// A reference to another entity type.
    Entity(String),
}

/// The declared type of a property: a kind plus nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    /// Type kind.
    pub kind: TypeKind,
    /// Whether null is an acceptable value.
    pub nullable: bool,
}

impl Primitive {
    /// Source-level name of the primitive.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::String => "string",
        }
    }
}

impl TypeKind {
    /// Name of the type as declared.
    pub fn name(&self) -> &str {
        match self {
            TypeKind::Primitive(p) => p.name(),
            TypeKind::Collection => "Collection",
            TypeKind::DateTime => "DateTime",
            TypeKind::Value(name) | TypeKind::Entity(name) => name,
        }
    }
}

impl DeclaredType {
    /// Create a non-nullable declared type.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    /// Create a nullable declared type.
    pub fn nullable(kind: TypeKind) -> Self {
        Self {
            kind,
            nullable: true,
        }
    }

    /// Declared type of a Rust property type.
    pub fn of<T: PropertyValue>() -> Self {
        T::declared_type()
    }

    /// Declared type referencing another entity.
    pub fn entity(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Entity(name.into()))
    }

    /// Make this type nullable.
    pub fn optional(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Check if null is accepted.
    pub fn allows_null(&self) -> bool {
        self.nullable
    }

    /// Check if this type references another entity.
    pub fn is_entity(&self) -> bool {
        matches!(self.kind, TypeKind::Entity(_))
    }

    /// Cast type tag inferred from the declared type alone.
    pub fn native_cast(&self) -> String {
        match &self.kind {
            TypeKind::Collection => "collection".to_string(),
            TypeKind::DateTime => "datetime".to_string(),
            TypeKind::Primitive(Primitive::Bool) => "boolean".to_string(),
            TypeKind::Primitive(Primitive::Int) => "integer".to_string(),
            other => other.name().to_string(),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "?{}", self.kind.name())
        } else {
            f.write_str(self.kind.name())
        }
    }
}

/// A Rust type usable as a typed entity property.
///
/// Implementations describe the declared type registered for the property and
/// convert between the Rust value and the attribute store's [`Value`].
pub trait PropertyValue: Sized {
    /// Declared type of this Rust type.
    fn declared_type() -> DeclaredType;

    /// Convert to an attribute value.
    fn to_value(&self) -> Value;

    /// Convert from an attribute value, or `None` if it is not representable.
    fn from_value(value: Value) -> Option<Self>;
}

impl PropertyValue for bool {
    fn declared_type() -> DeclaredType {
        DeclaredType::new(TypeKind::Primitive(Primitive::Bool))
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl PropertyValue for i64 {
    fn declared_type() -> DeclaredType {
        DeclaredType::new(TypeKind::Primitive(Primitive::Int))
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_i64()
    }
}

impl PropertyValue for i32 {
    fn declared_type() -> DeclaredType {
        DeclaredType::new(TypeKind::Primitive(Primitive::Int))
    }

    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_i64().and_then(|i| i32::try_from(i).ok())
    }
}

impl PropertyValue for f64 {
    fn declared_type() -> DeclaredType {
        DeclaredType::new(TypeKind::Primitive(Primitive::Float))
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_f64()
    }
}

impl PropertyValue for String {
    fn declared_type() -> DeclaredType {
        DeclaredType::new(TypeKind::Primitive(Primitive::String))
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PropertyValue for DateTime<Utc> {
    fn declared_type() -> DeclaredType {
        DeclaredType::new(TypeKind::DateTime)
    }

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_datetime().copied()
    }
}

impl<T: PropertyValue> PropertyValue for Vec<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::new(TypeKind::Collection)
    }

    fn to_value(&self) -> Value {
        Value::Collection(self.iter().map(PropertyValue::to_value).collect())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Collection(items) => items.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T: PropertyValue> PropertyValue for Option<T> {
    fn declared_type() -> DeclaredType {
        T::declared_type().optional()
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, PropertyValue::to_value)
    }

    fn from_value(value: Value) -> Option<Self> {
        if value.is_null() {
            return Some(None);
        }
        T::from_value(value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_casts() {
        assert_eq!(DeclaredType::of::<bool>().native_cast(), "boolean");
        assert_eq!(DeclaredType::of::<i64>().native_cast(), "integer");
        assert_eq!(DeclaredType::of::<i32>().native_cast(), "integer");
        assert_eq!(DeclaredType::of::<f64>().native_cast(), "float");
        assert_eq!(DeclaredType::of::<String>().native_cast(), "string");
        assert_eq!(DeclaredType::of::<DateTime<Utc>>().native_cast(), "datetime");
        assert_eq!(DeclaredType::of::<Vec<String>>().native_cast(), "collection");
        assert_eq!(
            DeclaredType::new(TypeKind::Value("Money".into())).native_cast(),
            "Money"
        );
    }

    #[test]
    fn test_nullability() {
        assert!(!DeclaredType::of::<i64>().allows_null());
        assert!(DeclaredType::of::<Option<i64>>().allows_null());
        assert_eq!(
            DeclaredType::of::<Option<i64>>().native_cast(),
            "integer"
        );
        assert_eq!(DeclaredType::of::<Option<i64>>().to_string(), "?int");
    }

    #[test]
    fn test_entity_reference() {
        let category = DeclaredType::entity("Category");
        assert!(category.is_entity());
        assert!(!DeclaredType::of::<String>().is_entity());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(i32::from_value(Value::Int(5)), Some(5));
        assert_eq!(i32::from_value(Value::Int(i64::MAX)), None);
        assert_eq!(f64::from_value(Value::Int(2)), Some(2.0));
        assert_eq!(String::from_value(Value::Int(2)), None);
        assert_eq!(Option::<i64>::from_value(Value::Null), Some(None));
        assert_eq!(i64::from_value(Value::Null), None);
        assert_eq!(
            Vec::<i64>::from_value(Value::Collection(vec![Value::Int(1), Value::Int(2)])),
            Some(vec![1, 2])
        );
        assert_eq!(
            Vec::<i64>::from_value(Value::Collection(vec![Value::Int(1), Value::Null])),
            None
        );
    }
}
