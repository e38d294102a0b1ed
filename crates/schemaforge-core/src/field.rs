//! Field descriptors.
//!
//! A [`FieldDescriptor`] is the structural description of one model attribute
//! as supplied by the data-model parser. Descriptors are immutable once a
//! generation run starts; the mapper only ever reads them.

use serde::{Deserialize, Serialize};

use crate::relationship::{RelationInfo, RelationRole};

/// Built-in scalar types understood by the type mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScalarKind {
    String,
    Int,
    BigInt,
    Float,
    Decimal,
    Boolean,
    DateTime,
    Json,
    Bytes,
}

impl ScalarKind {
    /// Parse a declared scalar type name (`"Int"`, `"DateTime"`, ...).
    ///
    /// Returns `None` for names that are not built-in scalars; those are
    /// resolved through the configured custom type mappings instead.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "String" => Some(ScalarKind::String),
            "Int" => Some(ScalarKind::Int),
            "BigInt" => Some(ScalarKind::BigInt),
            "Float" => Some(ScalarKind::Float),
            "Decimal" => Some(ScalarKind::Decimal),
            "Boolean" => Some(ScalarKind::Boolean),
            "DateTime" => Some(ScalarKind::DateTime),
            "Json" => Some(ScalarKind::Json),
            "Bytes" => Some(ScalarKind::Bytes),
            _ => None,
        }
    }

    /// The canonical declared type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::String => "String",
            ScalarKind::Int => "Int",
            ScalarKind::BigInt => "BigInt",
            ScalarKind::Float => "Float",
            ScalarKind::Decimal => "Decimal",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::DateTime => "DateTime",
            ScalarKind::Json => "Json",
            ScalarKind::Bytes => "Bytes",
        }
    }

    /// Whether the type needs a configurable strategy rather than a fixed
    /// expression. Counted as "complex" in generation statistics.
    #[must_use]
    pub const fn is_complex(&self) -> bool {
        matches!(
            self,
            ScalarKind::Decimal | ScalarKind::DateTime | ScalarKind::Json | ScalarKind::Bytes
        )
    }
}

/// What a field holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// A built-in scalar.
    Scalar(ScalarKind),
    /// A scalar whose type name is not built in (`type_name` carries it).
    CustomScalar,
    /// A reference to an enum declared in the same data model.
    Enum,
    /// A relation to another model.
    Relation(RelationInfo),
    /// Anything the parser produced that the engine does not understand.
    Unsupported,
}

/// Default value attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// A literal value (`@default(42)`, `@default("draft")`, enum variants).
    Literal(serde_json::Value),
    /// A generator function (`now()`, `uuid()`, `autoincrement()`, ...).
    Function { name: String, args: Vec<String> },
}

impl DefaultValue {
    /// Literal default.
    pub fn literal(value: impl Into<serde_json::Value>) -> Self {
        DefaultValue::Literal(value.into())
    }

    /// Argument-less generator function default.
    pub fn function(name: impl Into<String>) -> Self {
        DefaultValue::Function {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// `now()` default.
    pub fn now() -> Self {
        Self::function("now")
    }

    /// Whether this is the named generator function.
    #[must_use]
    pub fn is_function(&self, function: &str) -> bool {
        matches!(self, DefaultValue::Function { name, .. } if name == function)
    }

    /// Name of the generator function, if any.
    #[must_use]
    pub fn function_name(&self) -> Option<&str> {
        match self {
            DefaultValue::Function { name, .. } => Some(name),
            DefaultValue::Literal(_) => None,
        }
    }

    /// Short description (`"now()"`, `"42"`) for documentation.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            DefaultValue::Literal(value) => value.to_string(),
            DefaultValue::Function { name, args } => format!("{}({})", name, args.join(", ")),
        }
    }
}

/// Structural description of one model attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field name as it appears in the model.
    pub name: String,
    /// Scalar / enum / relation classification.
    pub kind: FieldKind,
    /// Declared type name (`"String"`, `"Role"`, `"User"`).
    pub type_name: String,
    /// Whether the field is list-valued.
    #[serde(default)]
    pub is_list: bool,
    /// Whether the descriptor marks the field as required.
    #[serde(default = "default_true")]
    pub is_required: bool,
    /// Whether the schema declares a default value.
    #[serde(default)]
    pub has_default_value: bool,
    /// Description of the default, when known.
    #[serde(default)]
    pub default: Option<DefaultValue>,
    /// Primary key flag.
    #[serde(default)]
    pub is_id: bool,
    /// Unique constraint flag.
    #[serde(default)]
    pub is_unique: bool,
    /// Auto-maintained "updated at" timestamp flag.
    #[serde(default)]
    pub is_updated_at: bool,
    /// Free-text documentation, possibly embedding annotation directives.
    #[serde(default)]
    pub documentation: Option<String>,
}

fn default_true() -> bool {
    true
}

impl FieldDescriptor {
    /// Create a field of the given kind. Required, single-valued, no default.
    pub fn new(name: impl Into<String>, kind: FieldKind, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            type_name: type_name.into(),
            is_list: false,
            is_required: true,
            has_default_value: false,
            default: None,
            is_id: false,
            is_unique: false,
            is_updated_at: false,
            documentation: None,
        }
    }

    /// Create a scalar field from its declared type name.
    ///
    /// Unknown type names become [`FieldKind::CustomScalar`].
    pub fn scalar(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let kind = ScalarKind::from_type_name(&type_name)
            .map_or(FieldKind::CustomScalar, FieldKind::Scalar);
        Self::new(name, kind, type_name)
    }

    /// Create an enum-typed field.
    pub fn enumeration(name: impl Into<String>, enum_name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Enum, enum_name)
    }

    /// Create a relation field.
    pub fn relation(name: impl Into<String>, relation: RelationInfo) -> Self {
        let type_name = relation.related_model.clone();
        Self::new(name, FieldKind::Relation(relation), type_name)
    }

    /// Mark as list-valued.
    #[must_use]
    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    /// Mark as not required.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }

    /// Set the required flag.
    #[must_use]
    pub fn required(mut self, value: bool) -> Self {
        self.is_required = value;
        self
    }

    /// Attach a default value.
    #[must_use]
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.has_default_value = true;
        self.default = Some(default);
        self
    }

    /// Mark as primary key.
    #[must_use]
    pub fn id(mut self) -> Self {
        self.is_id = true;
        self
    }

    /// Mark as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Mark as auto-maintained "updated at" timestamp.
    #[must_use]
    pub fn updated_at(mut self) -> Self {
        self.is_updated_at = true;
        self
    }

    /// Attach documentation text.
    #[must_use]
    pub fn doc(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// The built-in scalar kind, if this is a built-in scalar.
    #[must_use]
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self.kind {
            FieldKind::Scalar(kind) => Some(kind),
            _ => None,
        }
    }

    /// Relation metadata, if this is a relation field.
    #[must_use]
    pub fn relation_info(&self) -> Option<&RelationInfo> {
        match &self.kind {
            FieldKind::Relation(info) => Some(info),
            _ => None,
        }
    }

    /// Whether this is a relation field.
    #[must_use]
    pub fn is_relation(&self) -> bool {
        matches!(self.kind, FieldKind::Relation(_))
    }

    /// Whether this is the inverse side of a relation.
    #[must_use]
    pub fn is_back_relation(&self) -> bool {
        self.relation_info()
            .is_some_and(|info| info.role() == RelationRole::Back)
    }

    /// Whether the field is of the given built-in scalar kind.
    #[must_use]
    pub fn is_scalar(&self, kind: ScalarKind) -> bool {
        self.scalar_kind() == Some(kind)
    }
}
