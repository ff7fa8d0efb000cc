//! Typed property storage on entity structs.

use crate::catalog::PropertyValue;
use crate::error::{Error, Result};
use crate::value::Value;

/// A typed entity property that may be uninitialized.
///
/// An empty slot is the unset state: the engine leaves a non-nullable
/// property empty rather than storing a null it cannot represent.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot<T>(Option<T>);

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Slot<T> {
    /// An uninitialized slot.
    pub const fn empty() -> Self {
        Slot(None)
    }

    /// An initialized slot.
    pub fn new(value: T) -> Self {
        Slot(Some(value))
    }

    /// The current value, if initialized.
    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Mutable access to the current value, if initialized.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.0.as_mut()
    }

    /// Set the value.
    pub fn set(&mut self, value: impl Into<T>) {
        self.0 = Some(value.into());
    }

    /// Unset the value.
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Take the value out, leaving the slot unset.
    pub fn take(&mut self) -> Option<T> {
        self.0.take()
    }

    /// Check if the slot holds a value.
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl<T: PropertyValue> Slot<T> {
    /// The current value as an attribute value, if initialized.
    pub fn to_value(&self) -> Option<Value> {
        self.0.as_ref().map(PropertyValue::to_value)
    }

    /// Store an attribute value, converting it to `T`.
    pub fn assign(&mut self, property: &str, value: Value) -> Result<()> {
        let found = value.type_name();
        match T::from_value(value) {
            Some(converted) => {
                self.0 = Some(converted);
                Ok(())
            }
            None => Err(Error::TypeMismatch {
                property: property.to_string(),
                expected: T::declared_type().to_string(),
                found: found.to_string(),
            }),
        }
    }
}

/// Name-based access to an entity's typed property slots.
///
/// Usually generated with [`bind_properties!`](crate::bind_properties).
/// Every method fails with [`Error::UnknownProperty`] for names the entity
/// does not bind.
pub trait Properties {
    /// The property's value, or `None` when unset.
    fn read_property(&self, name: &str) -> Result<Option<Value>>;

    /// Store a value into the property's slot. No attribute write happens.
    fn write_property(&mut self, name: &str, value: Value) -> Result<()>;

    /// Unset the property.
    fn clear_property(&mut self, name: &str) -> Result<()>;

    /// Check if the property holds a value.
    fn is_property_set(&self, name: &str) -> Result<bool> {
        Ok(self.read_property(name)?.is_some())
    }
}

/// Implement [`Properties`] for an entity struct over its [`Slot`] fields.
///
/// ```
/// use fluentorm_core::{bind_properties, Properties, Slot, Value};
///
/// #[derive(Default)]
/// struct Post {
///     title: Slot<String>,
///     views: Slot<i64>,
/// }
///
/// bind_properties!(Post { title, views });
///
/// let mut post = Post::default();
/// post.write_property("views", Value::Int(3)).unwrap();
/// assert_eq!(post.views.get(), Some(&3));
/// assert!(!post.is_property_set("title").unwrap());
/// ```
#[macro_export]
macro_rules! bind_properties {
    ($entity:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Properties for $entity {
            fn read_property(
                &self,
                name: &str,
            ) -> $crate::Result<::std::option::Option<$crate::Value>> {
                match name {
                    $(stringify!($field) => ::std::result::Result::Ok(self.$field.to_value()),)*
                    _ => ::std::result::Result::Err($crate::Error::UnknownProperty(name.to_string())),
                }
            }

            fn write_property(&mut self, name: &str, value: $crate::Value) -> $crate::Result<()> {
                match name {
                    $(stringify!($field) => self.$field.assign(name, value),)*
                    _ => {
                        let _ = value;
                        ::std::result::Result::Err($crate::Error::UnknownProperty(name.to_string()))
                    }
                }
            }

            fn clear_property(&mut self, name: &str) -> $crate::Result<()> {
                match name {
                    $(stringify!($field) => {
                        self.$field.clear();
                        ::std::result::Result::Ok(())
                    })*
                    _ => ::std::result::Result::Err($crate::Error::UnknownProperty(name.to_string())),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Note {
        body: Slot<String>,
        pinned: Slot<bool>,
        rating: Slot<Option<i64>>,
    }

    crate::bind_properties!(Note { body, pinned, rating });

    #[test]
    fn test_slot_state() {
        let mut slot: Slot<String> = Slot::empty();
        assert!(!slot.is_set());
        assert_eq!(slot.to_value(), None);

        slot.set("hello");
        assert_eq!(slot.get().map(String::as_str), Some("hello"));
        assert_eq!(slot.to_value(), Some(Value::from("hello")));

        assert_eq!(slot.take(), Some("hello".to_string()));
        assert!(!slot.is_set());
    }

    #[test]
    fn test_assign_type_mismatch() {
        let mut slot: Slot<i64> = Slot::default();
        let err = slot.assign("count", Value::from("seven")).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                property: "count".into(),
                expected: "int".into(),
                found: "string".into(),
            }
        );
        assert!(!slot.is_set());
    }

    #[test]
    fn test_nullable_slot_holds_null() {
        let mut slot: Slot<Option<i64>> = Slot::empty();
        slot.assign("gamma", Value::Null).unwrap();
        assert!(slot.is_set());
        assert_eq!(slot.get(), Some(&None));
        assert_eq!(slot.to_value(), Some(Value::Null));
    }

    #[test]
    fn test_generated_properties() {
        let mut note = Note::default();
        note.write_property("body", Value::from("text")).unwrap();
        note.write_property("pinned", Value::from(true)).unwrap();

        assert_eq!(note.read_property("body").unwrap(), Some(Value::from("text")));
        assert!(note.is_property_set("pinned").unwrap());
        assert!(!note.is_property_set("rating").unwrap());

        note.clear_property("body").unwrap();
        assert!(!note.body.is_set());
        assert!(note.pinned.get().copied().unwrap_or(false));

        assert_eq!(
            note.read_property("missing").unwrap_err(),
            Error::UnknownProperty("missing".into())
        );
        assert!(note.write_property("missing", Value::Null).is_err());
    }
}
