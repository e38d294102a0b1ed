//! Optionality resolution.
//!
//! Every field maps to exactly one [`OptionalityReason`]. The first applicable
//! rule picks the reason and the modifier; later rules may only add notes.

use serde::{Deserialize, Serialize};

use schemaforge_core::{
    DatabaseProvider, DefaultValue, FieldDescriptor, GeneratorConfig, Modifier, ModelDescriptor,
    ScalarKind,
};

use crate::literal::default_argument;

/// Why a field is (or is not) optional on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalityReason {
    Required,
    SchemaOptional,
    HasDefault,
    AutoGenerated,
    BackRelation,
    NullableForeignKeys,
}

impl OptionalityReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            OptionalityReason::Required => "required",
            OptionalityReason::SchemaOptional => "schema_optional",
            OptionalityReason::HasDefault => "has_default",
            OptionalityReason::AutoGenerated => "auto_generated",
            OptionalityReason::BackRelation => "back_relation",
            OptionalityReason::NullableForeignKeys => "nullable_foreign_keys",
        }
    }
}

/// Classification plus the modifier to append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalityResult {
    pub reason: OptionalityReason,
    pub is_optional: bool,
    pub modifier: Option<Modifier>,
    pub notes: Vec<String>,
}

impl OptionalityResult {
    fn new(reason: OptionalityReason, is_optional: bool, modifier: Option<Modifier>) -> Self {
        Self {
            reason,
            is_optional,
            modifier,
            notes: Vec::new(),
        }
    }

    fn required() -> Self {
        Self::new(OptionalityReason::Required, false, None)
    }
}

/// Whether the database or ORM fills the field in when it is omitted.
///
/// True for primary keys with a default, `@updatedAt` timestamps and
/// date-time fields defaulting to `now()`.
pub fn is_auto_generated(field: &FieldDescriptor) -> bool {
    if field.is_id && field.has_default_value {
        return true;
    }
    if field.is_updated_at {
        return true;
    }
    field.is_scalar(ScalarKind::DateTime)
        && field
            .default
            .as_ref()
            .is_some_and(|d| d.is_function("now"))
}

/// Resolve optionality for `field` within `model`.
pub fn resolve(
    field: &FieldDescriptor,
    model: &ModelDescriptor,
    config: &GeneratorConfig,
) -> OptionalityResult {
    let behavior = Modifier::bare(config.optional_field_behavior.modifier_name());
    let auto = is_auto_generated(field);

    let mut result = if !field.is_required {
        let mut result =
            OptionalityResult::new(OptionalityReason::SchemaOptional, true, Some(behavior));
        if field.has_default_value {
            result
                .notes
                .push("Optional field also declares a default".to_string());
        }
        result
    } else if field.has_default_value {
        resolve_default(field, auto)
    } else if auto {
        let mut result = OptionalityResult::new(
            OptionalityReason::AutoGenerated,
            true,
            Some(Modifier::bare("optional")),
        );
        result
            .notes
            .push("Maintained automatically on update".to_string());
        result
    } else if let Some(info) = field.relation_info() {
        if info.owns_foreign_keys() {
            resolve_foreign_keys(field, model, &info.from_fields, behavior)
        } else {
            let mut result = OptionalityResult::new(
                OptionalityReason::BackRelation,
                true,
                Some(Modifier::bare("optional")),
            );
            result
                .notes
                .push(format!("Inverse side of the relation with {}", info.related_model));
            result
        }
    } else {
        OptionalityResult::required()
    };

    if field.is_id && field.has_default_value {
        result.notes.push(provider_id_note(config.provider, field));
    }

    tracing::trace!(
        target: "schemaforge::mapper",
        model = %model.name,
        field = %field.name,
        reason = result.reason.as_str(),
        "Resolved optionality"
    );
    result
}

fn resolve_default(field: &FieldDescriptor, auto: bool) -> OptionalityResult {
    if auto {
        let mut result = OptionalityResult::new(
            OptionalityReason::HasDefault,
            true,
            Some(Modifier::bare("optional")),
        );
        result
            .notes
            .push("Default is generated on insert; safe to omit".to_string());
        return result;
    }

    match &field.default {
        Some(DefaultValue::Literal(value)) => OptionalityResult::new(
            OptionalityReason::HasDefault,
            false,
            Some(Modifier::new("default", default_argument(value, field))),
        ),
        Some(default @ DefaultValue::Function { .. }) => {
            let mut result = OptionalityResult::new(OptionalityReason::HasDefault, false, None);
            result
                .notes
                .push(format!("Default {} is applied by the database", default.describe()));
            result
        }
        None => OptionalityResult::new(OptionalityReason::HasDefault, false, None),
    }
}

fn resolve_foreign_keys(
    field: &FieldDescriptor,
    model: &ModelDescriptor,
    from_fields: &[String],
    behavior: Modifier,
) -> OptionalityResult {
    let mut missing = Vec::new();
    let mut all_optional = true;
    for name in from_fields {
        match model.find_field(name) {
            Some(fk) => all_optional &= !fk.is_required,
            None => {
                missing.push(name.as_str());
                all_optional = false;
            }
        }
    }

    let mut result = if all_optional {
        OptionalityResult::new(OptionalityReason::NullableForeignKeys, true, Some(behavior))
    } else {
        OptionalityResult::required()
    };
    if !missing.is_empty() {
        result.notes.push(format!(
            "Foreign key field(s) {} not found on {}; treated as required",
            missing.join(", "),
            model.name
        ));
    }
    if all_optional {
        result
            .notes
            .push(format!("All foreign keys of `{}` are optional", field.name));
    }
    result
}

fn provider_id_note(provider: DatabaseProvider, field: &FieldDescriptor) -> String {
    let generator = field
        .default
        .as_ref()
        .and_then(DefaultValue::function_name)
        .unwrap_or("default");
    let convention = match (provider, generator) {
        (DatabaseProvider::Mongodb, _) => "ObjectId assigned by the driver or database",
        (DatabaseProvider::Postgresql, "autoincrement") => "SERIAL / IDENTITY column",
        (DatabaseProvider::Cockroachdb, "autoincrement") => "unique_rowid() column",
        (DatabaseProvider::Mysql, "autoincrement") => "AUTO_INCREMENT column",
        (DatabaseProvider::Sqlite, "autoincrement") => "INTEGER PRIMARY KEY rowid alias",
        (DatabaseProvider::Sqlserver, "autoincrement") => "IDENTITY(1,1) column",
        _ => "value generated on insert",
    };
    format!(
        "{} id via {}(): {}",
        provider.display_name(),
        generator,
        convention
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaforge_core::{OptionalFieldBehavior, RelationInfo};

    fn model_with(fields: Vec<FieldDescriptor>) -> ModelDescriptor {
        fields
            .into_iter()
            .fold(ModelDescriptor::new("Post"), ModelDescriptor::field)
    }

    fn resolve_in(field: &FieldDescriptor, model: &ModelDescriptor) -> OptionalityResult {
        resolve(field, model, &GeneratorConfig::default())
    }

    #[test]
    fn test_required_field() {
        let field = FieldDescriptor::scalar("title", "String");
        let result = resolve_in(&field, &model_with(vec![field.clone()]));
        assert_eq!(result.reason, OptionalityReason::Required);
        assert!(!result.is_optional);
        assert!(result.modifier.is_none());
    }

    #[test]
    fn test_schema_optional_uses_configured_behavior() {
        let field = FieldDescriptor::scalar("bio", "String").optional();
        let model = model_with(vec![field.clone()]);
        let result = resolve_in(&field, &model);
        assert_eq!(result.reason, OptionalityReason::SchemaOptional);
        assert_eq!(result.modifier, Some(Modifier::bare("optional")));

        let config = GeneratorConfig::default()
            .optional_field_behavior(OptionalFieldBehavior::Nullish);
        let result = resolve(&field, &model, &config);
        assert_eq!(result.modifier, Some(Modifier::bare("nullish")));
    }

    #[test]
    fn test_id_with_default_is_optional() {
        let field = FieldDescriptor::scalar("id", "Int")
            .id()
            .with_default(DefaultValue::function("autoincrement"));
        let result = resolve_in(&field, &model_with(vec![field.clone()]));
        assert_eq!(result.reason, OptionalityReason::HasDefault);
        assert!(result.is_optional);
        assert_eq!(result.modifier, Some(Modifier::bare("optional")));
        assert!(result.notes.iter().any(|n| n.contains("SERIAL")));
    }

    #[test]
    fn test_literal_default_stays_required() {
        let field = FieldDescriptor::scalar("views", "Int").with_default(DefaultValue::literal(0));
        let result = resolve_in(&field, &model_with(vec![field.clone()]));
        assert_eq!(result.reason, OptionalityReason::HasDefault);
        assert!(!result.is_optional);
        assert_eq!(result.modifier, Some(Modifier::new("default", "0")));
    }

    #[test]
    fn test_non_id_function_default_has_no_modifier() {
        let field = FieldDescriptor::scalar("token", "String")
            .with_default(DefaultValue::function("uuid"));
        let result = resolve_in(&field, &model_with(vec![field.clone()]));
        assert_eq!(result.reason, OptionalityReason::HasDefault);
        assert!(!result.is_optional);
        assert!(result.modifier.is_none());
    }

    #[test]
    fn test_now_default_is_auto_generated() {
        let field = FieldDescriptor::scalar("createdAt", "DateTime")
            .with_default(DefaultValue::now());
        assert!(is_auto_generated(&field));
        let result = resolve_in(&field, &model_with(vec![field.clone()]));
        assert_eq!(result.reason, OptionalityReason::HasDefault);
        assert!(result.is_optional);
    }

    #[test]
    fn test_updated_at_is_auto_generated() {
        let field = FieldDescriptor::scalar("updatedAt", "DateTime").updated_at();
        let result = resolve_in(&field, &model_with(vec![field.clone()]));
        assert_eq!(result.reason, OptionalityReason::AutoGenerated);
        assert!(result.is_optional);
    }

    #[test]
    fn test_back_relation() {
        let field = FieldDescriptor::relation("comments", RelationInfo::new("Comment")).list();
        let result = resolve_in(&field, &model_with(vec![field.clone()]));
        assert_eq!(result.reason, OptionalityReason::BackRelation);
        assert_eq!(result.modifier, Some(Modifier::bare("optional")));
    }

    #[test]
    fn test_nullable_foreign_keys() {
        let fk = FieldDescriptor::scalar("authorId", "Int").optional();
        let rel = FieldDescriptor::relation(
            "author",
            RelationInfo::new("User")
                .from_fields(["authorId"])
                .references(["id"]),
        );
        let model = model_with(vec![fk, rel.clone()]);
        let result = resolve_in(&rel, &model);
        assert_eq!(result.reason, OptionalityReason::NullableForeignKeys);
        assert!(result.is_optional);
    }

    #[test]
    fn test_required_foreign_keys() {
        let fk = FieldDescriptor::scalar("authorId", "Int");
        let rel = FieldDescriptor::relation(
            "author",
            RelationInfo::new("User").from_fields(["authorId"]),
        );
        let model = model_with(vec![fk, rel.clone()]);
        let result = resolve_in(&rel, &model);
        assert_eq!(result.reason, OptionalityReason::Required);
        assert!(result.modifier.is_none());
    }

    #[test]
    fn test_missing_foreign_key_is_noted() {
        let rel = FieldDescriptor::relation(
            "author",
            RelationInfo::new("User").from_fields(["ghostId"]),
        );
        let model = model_with(vec![rel.clone()]);
        let result = resolve_in(&rel, &model);
        assert_eq!(result.reason, OptionalityReason::Required);
        assert!(result.notes[0].contains("ghostId"));
    }
}
