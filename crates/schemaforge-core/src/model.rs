//! Model and enum descriptors.

use serde::{Deserialize, Serialize};

use crate::field::FieldDescriptor;

/// A named, ordered collection of field descriptors.
///
/// Field order is significant: generated schemas list fields in exactly this
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    /// Model name (`"User"`).
    pub name: String,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    /// Model documentation, possibly embedding model-level directives.
    #[serde(default)]
    pub documentation: Option<String>,
}

impl ModelDescriptor {
    /// Create an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            documentation: None,
        }
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Attach documentation text.
    #[must_use]
    pub fn doc(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Look up a field by name.
    #[must_use]
    pub fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Primary-key fields.
    pub fn id_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_id)
    }

    /// Relation fields.
    pub fn relation_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_relation())
    }
}

/// An enum declared in the data model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDescriptor {
    /// Enum name (`"Role"`).
    pub name: String,
    /// Variant names in declaration order.
    pub values: Vec<String>,
    /// Enum documentation.
    #[serde(default)]
    pub documentation: Option<String>,
}

impl EnumDescriptor {
    /// Create an enum descriptor.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            documentation: None,
        }
    }

    /// Attach documentation text.
    #[must_use]
    pub fn doc(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::RelationInfo;

    #[test]
    fn test_model_preserves_field_order() {
        let model = ModelDescriptor::new("User")
            .field(FieldDescriptor::scalar("id", "Int").id())
            .field(FieldDescriptor::scalar("email", "String"))
            .field(FieldDescriptor::relation("posts", RelationInfo::new("Post")).list());

        let names: Vec<&str> = model.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "posts"]);
        assert_eq!(model.id_fields().count(), 1);
        assert_eq!(model.relation_fields().count(), 1);
        assert!(model.find_field("email").is_some());
        assert!(model.find_field("missing").is_none());
    }

    #[test]
    fn test_enum_descriptor() {
        let role = EnumDescriptor::new("Role", ["USER", "ADMIN"]).doc("Access level");
        assert_eq!(role.values, vec!["USER", "ADMIN"]);
        assert_eq!(role.documentation.as_deref(), Some("Access level"));
    }
}
