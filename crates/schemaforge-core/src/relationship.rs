//! Relation metadata for schemaforge field descriptors.
//!
//! Relations are supplied as part of the parsed data model. A relation field
//! either owns the foreign keys that implement it (the forward side) or is the
//! inverse view of a relation owned by the other model (the back side). Both
//! sides render identically; the role only feeds documentation and the
//! optionality rules.

use serde::{Deserialize, Serialize};

/// Which side of a relation a field sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationRole {
    /// The field owns local foreign-key fields: `Post.author` via `authorId`.
    #[default]
    Forward,
    /// The field is the inverse side: `User.posts`.
    Back,
}

/// Cardinality of a relation as seen from the owning model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    /// One-to-one: `User` has one `Profile`.
    OneToOne,
    /// Many-to-one: many `Post`s belong to one `User`.
    #[default]
    ManyToOne,
    /// One-to-many: one `User` has many `Post`s.
    OneToMany,
    /// Many-to-many: implicit relation through a hidden link table.
    ManyToMany,
}

impl RelationshipKind {
    /// Short human readable label used in generated documentation.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            RelationshipKind::OneToOne => "one-to-one",
            RelationshipKind::ManyToOne => "many-to-one",
            RelationshipKind::OneToMany => "one-to-many",
            RelationshipKind::ManyToMany => "many-to-many",
        }
    }
}

/// Metadata about the relation carried by a relation field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationInfo {
    /// Name of the related model (e.g. `"User"`).
    pub related_model: String,

    /// Relation discriminator name, when the schema names the relation.
    #[serde(default)]
    pub relation_name: Option<String>,

    /// Local foreign-key fields owned by this side (e.g. `["authorId"]`).
    #[serde(default)]
    pub from_fields: Vec<String>,

    /// Fields on the related model referenced by `from_fields`.
    #[serde(default)]
    pub references: Vec<String>,
}

impl RelationInfo {
    /// Create relation metadata pointing at `related_model`.
    pub fn new(related_model: impl Into<String>) -> Self {
        Self {
            related_model: related_model.into(),
            ..Self::default()
        }
    }

    /// Set the relation discriminator name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.relation_name = Some(name.into());
        self
    }

    /// Set the local foreign-key fields.
    #[must_use]
    pub fn from_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the referenced fields on the related model.
    #[must_use]
    pub fn references<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this side owns foreign keys.
    #[must_use]
    pub fn owns_foreign_keys(&self) -> bool {
        !self.from_fields.is_empty()
    }

    /// Role of this side of the relation.
    #[must_use]
    pub fn role(&self) -> RelationRole {
        if self.owns_foreign_keys() {
            RelationRole::Forward
        } else {
            RelationRole::Back
        }
    }

    /// Cardinality as seen from the owning model, given the field's list-ness.
    #[must_use]
    pub fn kind(&self, is_list: bool) -> RelationshipKind {
        match (self.role(), is_list) {
            (RelationRole::Forward, false) => RelationshipKind::ManyToOne,
            (RelationRole::Forward, true) => RelationshipKind::ManyToMany,
            (RelationRole::Back, true) => RelationshipKind::OneToMany,
            (RelationRole::Back, false) => RelationshipKind::OneToOne,
        }
    }
}
