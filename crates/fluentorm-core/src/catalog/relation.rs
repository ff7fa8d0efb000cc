//! Relation markers.
//!
//! Relations are bound by a separate concern. Here they only need to be
//! recognizable so that relation properties stay out of attribute management.

/// Kind of relation a property represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Generic relation marker (relation defined elsewhere on the entity).
    Relation,
    /// Inverse side of a one-to-one or one-to-many relation.
    BelongsTo,
    /// One-to-one relation.
    HasOne,
    /// One-to-many relation.
    HasMany,
    /// Many-to-many relation through a pivot.
    BelongsToMany,
}

/// A relation marker attached to a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationDecl {
    /// Relation kind.
    pub kind: RelationKind,
    /// Related entity name, when declared.
    pub related: Option<String>,
}

impl RelationDecl {
    /// Generic relation marker.
    pub fn relation() -> Self {
        Self {
            kind: RelationKind::Relation,
            related: None,
        }
    }

    /// Belongs-to relation, related entity inferred from the property type.
    pub fn belongs_to() -> Self {
        Self {
            kind: RelationKind::BelongsTo,
            related: None,
        }
    }

    /// Has-one relation to the given entity.
    pub fn has_one(related: impl Into<String>) -> Self {
        Self {
            kind: RelationKind::HasOne,
            related: Some(related.into()),
        }
    }

    /// Has-many relation to the given entity.
    pub fn has_many(related: impl Into<String>) -> Self {
        Self {
            kind: RelationKind::HasMany,
            related: Some(related.into()),
        }
    }

    /// Many-to-many relation to the given entity.
    pub fn belongs_to_many(related: impl Into<String>) -> Self {
        Self {
            kind: RelationKind::BelongsToMany,
            related: Some(related.into()),
        }
    }

    /// Set the related entity.
    pub fn with_related(mut self, related: impl Into<String>) -> Self {
        self.related = Some(related.into());
        self
    }

    /// Check if the relation yields a collection of entities.
    pub fn is_to_many(&self) -> bool {
        matches!(
            self.kind,
            RelationKind::HasMany | RelationKind::BelongsToMany
        )
    }
}
