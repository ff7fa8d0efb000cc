//! Mass-assignment markers and the guarded attribute list.

use std::ops::{BitOr, BitOrAssign};

/// Inclusion flags of a class-level [`Fillable`] marker.
///
/// By default a class-level `Fillable` leaves out the primary key and the
/// timestamp-role columns; these flags opt them back in. They carry no
/// meaning on a property-level marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct FillableFlags(u8);

impl FillableFlags {
    /// No inclusions.
    pub const NONE: Self = Self(0);
    /// Include the primary key.
    pub const INCLUDE_PRIMARY_KEY: Self = Self(1);
    /// Include the created-at, updated-at and deleted-at columns.
    pub const INCLUDE_DATES: Self = Self(2);
    /// Include everything.
    pub const INCLUDE_ALL: Self = Self(Self::INCLUDE_PRIMARY_KEY.0 | Self::INCLUDE_DATES.0);

    /// Raw bit representation.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Check if every flag in `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for FillableFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FillableFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Marks an entity (or a single property) as mass-assignable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Fillable {
    /// Inclusion flags (class level only).
    pub flags: FillableFlags,
}

impl Fillable {
    /// Fillable marker without inclusion flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fillable marker with inclusion flags.
    pub fn with_flags(flags: FillableFlags) -> Self {
        Self { flags }
    }

    /// Check if the primary key is included.
    pub fn includes_primary_key(&self) -> bool {
        self.flags.contains(FillableFlags::INCLUDE_PRIMARY_KEY)
    }

    /// Check if the timestamp-role columns are included.
    pub fn includes_dates(&self) -> bool {
        self.flags.contains(FillableFlags::INCLUDE_DATES)
    }
}

/// Marks an entity (or a single property) as guarded against mass assignment.
///
/// On an entity it resets the guarded list to [`GuardedList::All`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Guarded;

/// Property-level mass-assignment declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardDecl {
    /// The property is fillable.
    Fillable,
    /// The property is guarded.
    Guarded,
}

/// The guarded attribute list of a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GuardedList {
    /// Every attribute is guarded (`["*"]`).
    All,
    /// Only the listed attributes are guarded.
    Only(Vec<String>),
}

impl GuardedList {
    /// Wildcard entry standing for every attribute.
    pub const WILDCARD: &'static str = "*";

    /// Empty guarded list (nothing guarded).
    pub fn none() -> Self {
        GuardedList::Only(Vec::new())
    }

    /// Build from attribute names; a lone `"*"` becomes [`GuardedList::All`].
    pub fn from_names(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() == 1 && names[0] == Self::WILDCARD {
            GuardedList::All
        } else {
            GuardedList::Only(names)
        }
    }

    /// Check if this is the all-guarded sentinel.
    pub fn is_all(&self) -> bool {
        matches!(self, GuardedList::All)
    }

    /// Check if an attribute is guarded.
    pub fn guards(&self, name: &str) -> bool {
        match self {
            GuardedList::All => true,
            GuardedList::Only(names) => names.iter().any(|n| n == name),
        }
    }

    /// Append an attribute. No-op for [`GuardedList::All`] or when already listed.
    pub fn push(&mut self, name: &str) {
        if let GuardedList::Only(names) = self {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }

    /// Remove one occurrence of an attribute. No-op for [`GuardedList::All`].
    pub fn remove(&mut self, name: &str) {
        if let GuardedList::Only(names) = self {
            if let Some(index) = names.iter().position(|n| n == name) {
                names.remove(index);
            }
        }
    }

    /// The list as attribute names, with `"*"` for the sentinel.
    pub fn to_names(&self) -> Vec<String> {
        match self {
            GuardedList::All => vec![Self::WILDCARD.to_string()],
            GuardedList::Only(names) => names.clone(),
        }
    }
}

impl Default for GuardedList {
    fn default() -> Self {
        GuardedList::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fillable_flags() {
        let flags = FillableFlags::INCLUDE_PRIMARY_KEY | FillableFlags::INCLUDE_DATES;
        assert_eq!(flags, FillableFlags::INCLUDE_ALL);
        assert_eq!(flags.bits(), 3);

        let fillable = Fillable::with_flags(FillableFlags::INCLUDE_DATES);
        assert!(fillable.includes_dates());
        assert!(!fillable.includes_primary_key());

        let mut flags = FillableFlags::NONE;
        flags |= FillableFlags::INCLUDE_PRIMARY_KEY;
        assert!(Fillable::with_flags(flags).includes_primary_key());
        assert!(!Fillable::new().includes_dates());
    }

    #[test]
    fn test_guarded_sentinel_absorbs_pushes() {
        let mut guarded = GuardedList::All;
        guarded.push("secret");
        guarded.remove("secret");
        assert_eq!(guarded, GuardedList::All);
        assert!(guarded.guards("anything"));
        assert_eq!(guarded.to_names(), vec!["*"]);
    }

    #[test]
    fn test_guarded_list_removes_one_element() {
        let mut guarded = GuardedList::from_names(["a", "b", "c"]);
        guarded.remove("b");
        assert_eq!(guarded, GuardedList::from_names(["a", "c"]));

        guarded.push("a");
        assert_eq!(guarded.to_names(), vec!["a", "c"]);
    }

    #[test]
    fn test_from_names_wildcard() {
        assert!(GuardedList::from_names(["*"]).is_all());
        assert!(!GuardedList::none().is_all());
        assert!(!GuardedList::none().guards("id"));
    }
}
