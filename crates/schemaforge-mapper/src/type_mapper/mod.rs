//! Field type mapping.
//!
//! [`TypeMapper::map`] turns one field descriptor into its final validation
//! expression plus the metadata the composer aggregates. Mapping is total:
//! every internal failure degrades to the configured permissive expression
//! with a warning.
//!
//! Per field, in order:
//!
//! 1. extract directives from the field documentation;
//! 2. a full-replacement directive short-circuits type dispatch;
//! 3. a structure directive replaces the base type, otherwise the field kind
//!    is dispatched to its strategy;
//! 4. list fields are wrapped in `z.array(...)`;
//! 5. chain directives are merged;
//! 6. the optionality modifier is appended;
//! 7. documentation and provider notes are attached.

mod bytes;
mod datetime;
mod decimal;
mod json;
mod scalar;

use std::collections::BTreeSet;

use serde_json::Value;

use schemaforge_core::{
    Directive, EntityKind, Error, Expr, Extraction, FieldContext, FieldDescriptor, FieldKind,
    GeneratorConfig, Import, Modifier, ModelDescriptor, Result, ScalarKind, regex_literal,
};

pub use bytes::{BASE64_PATTERN, HEX_PATTERN, base64_length};
pub use datetime::{DATE_PATTERN, ISO_DATETIME_PATTERN, ISO_DATETIME_UTC_PATTERN};
pub use decimal::decimal_pattern;
pub use scalar::BIGINT_STRING_PATTERN;

use crate::context::MapperContext;
use crate::docs;
use crate::literal::structure_from_payload;
use crate::merge::merge_directives;
use crate::optionality::{self, OptionalityResult};

/// Everything the mapper produced for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMappingResult {
    /// Final expression, optionality included.
    pub expression: Expr,
    pub imports: BTreeSet<Import>,
    /// Validation and annotation notes.
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
    /// The expression transforms its input or checks class instances.
    pub requires_special_handling: bool,
    /// Description text left after directive extraction.
    pub description: Option<String>,
    /// Generated documentation block.
    pub documentation: Option<String>,
    pub database_notes: Vec<String>,
    pub optionality: OptionalityResult,
    /// Number of directives that changed the expression.
    pub directives_applied: usize,
    /// The expression is the permissive fallback.
    pub is_fallback: bool,
}

/// Partial result of a per-kind strategy.
#[derive(Debug, Clone)]
pub(crate) struct TypeExpression {
    pub expr: Expr,
    pub imports: BTreeSet<Import>,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
    pub special: bool,
    pub fallback: bool,
}

impl TypeExpression {
    pub(crate) fn new(expr: Expr) -> Self {
        Self {
            expr,
            imports: BTreeSet::new(),
            notes: Vec::new(),
            warnings: Vec::new(),
            special: false,
            fallback: false,
        }
    }

    pub(crate) fn import(mut self, import: Import) -> Self {
        self.imports.insert(import);
        self
    }
}

/// `{ error: "..." }` (or `{ message: "..." }` for v3).
pub(crate) fn message_params(config: &GeneratorConfig, message: &str) -> String {
    format!(
        "{{ {}: {} }}",
        config.target.message_key(),
        Value::String(message.to_string())
    )
}

/// `.regex(/pattern/, { error: "..." })`, after compiling the pattern.
pub(crate) fn regex_modifier(
    pattern: &str,
    message: &str,
    config: &GeneratorConfig,
) -> Result<Modifier> {
    Ok(Modifier::new(
        "regex",
        format!(
            "{}, {}",
            regex_literal(pattern)?,
            message_params(config, message)
        ),
    ))
}

/// Maps field descriptors to validation expressions.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    ctx: MapperContext<'a>,
}

impl<'a> TypeMapper<'a> {
    pub fn new(ctx: MapperContext<'a>) -> Self {
        Self { ctx }
    }

    /// Map `field` of `model`. Never fails.
    pub fn map(&self, field: &FieldDescriptor, model: &ModelDescriptor) -> FieldMappingResult {
        tracing::debug!(
            target: "schemaforge::mapper",
            model = %model.name,
            field = %field.name,
            type_name = %field.type_name,
            "Mapping field"
        );

        match self.try_map(field, model) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    target: "schemaforge::mapper",
                    model = %model.name,
                    field = %field.name,
                    error = %e,
                    "Field mapping failed, using fallback expression"
                );
                self.fallback(field, model, &e)
            }
        }
    }

    /// The permissive result substituted when mapping fails.
    pub fn fallback(
        &self,
        field: &FieldDescriptor,
        model: &ModelDescriptor,
        error: &Error,
    ) -> FieldMappingResult {
        let mut expression = Expr::call(self.ctx.config.fallback_expression());
        let optionality = optionality::resolve(field, model, self.ctx.config);
        if let Some(modifier) = &optionality.modifier {
            expression.push(modifier.clone());
        }
        FieldMappingResult {
            expression,
            imports: BTreeSet::from([Import::Zod]),
            notes: Vec::new(),
            warnings: vec![format!("{error}; using {}()", self.ctx.config.fallback_expression())],
            requires_special_handling: false,
            description: field.documentation.clone(),
            documentation: None,
            database_notes: Vec::new(),
            optionality,
            directives_applied: 0,
            is_fallback: true,
        }
    }

    fn try_map(
        &self,
        field: &FieldDescriptor,
        model: &ModelDescriptor,
    ) -> Result<FieldMappingResult> {
        let config = self.ctx.config;
        let mut warnings = Vec::new();
        let mut notes = Vec::new();

        let extraction = self.extract(field, model, &mut warnings);
        let Extraction {
            mut directives,
            description,
            ..
        } = extraction;

        let mut imports = BTreeSet::from([Import::Zod]);
        let mut special = false;
        let mut fallback = false;
        let mut applied = 0;

        let replacement = directives
            .iter()
            .position(|d| matches!(d, Directive::Replace(_)));

        let mut expression = if let Some(index) = replacement {
            let Directive::Replace(expr) = directives.remove(index) else {
                return Err(Error::annotation(&field.name, "replacement directive vanished"));
            };
            if !directives.is_empty() {
                notes.push(format!(
                    "{} directive(s) ignored after full replacement",
                    directives.len()
                ));
            }
            applied += 1;
            special = true;
            expr
        } else {
            let structure = directives.iter().find_map(|d| match d {
                Directive::Structure { payload, chain } => Some((payload, chain)),
                _ => None,
            });

            let (mut expr, from_structure) = match structure {
                Some((payload, chain)) => {
                    let mut expr = structure_from_payload(payload)?;
                    expr.extend(chain.iter().cloned());
                    applied += 1;
                    (expr, true)
                }
                None => {
                    let ty = self.map_kind(field, model)?;
                    imports.extend(ty.imports);
                    notes.extend(ty.notes);
                    warnings.extend(ty.warnings);
                    special = ty.special;
                    fallback = ty.fallback;
                    (ty.expr, false)
                }
            };

            if field.is_list && !(from_structure && expr.is_array()) {
                expr = Expr::array(expr);
            }

            match merge_directives(expr.clone(), &directives, field) {
                Ok(outcome) => {
                    applied += outcome.applied;
                    notes.extend(outcome.notes);
                    outcome.expression
                }
                Err(e) => {
                    tracing::warn!(
                        target: "schemaforge::mapper",
                        model = %model.name,
                        field = %field.name,
                        error = %e,
                        "Annotation merge failed, keeping generated expression"
                    );
                    warnings.push(format!("Annotation merge failed: {e}; directives ignored"));
                    expr
                }
            }
        };

        let optionality = optionality::resolve(field, model, config);
        if let Some(modifier) = &optionality.modifier {
            notes.extend(apply_optionality(&mut expression, modifier));
        }
        notes.extend(optionality.notes.iter().cloned());

        let documentation = Some(docs::field_documentation(
            field,
            description.as_deref(),
            &expression,
        ));
        let database_notes = if config.database_validation {
            docs::database_notes(field, config)
        } else {
            Vec::new()
        };

        Ok(FieldMappingResult {
            expression,
            imports,
            notes,
            warnings,
            requires_special_handling: special,
            description,
            documentation,
            database_notes,
            optionality,
            directives_applied: applied,
            is_fallback: fallback,
        })
    }

    fn extract(
        &self,
        field: &FieldDescriptor,
        model: &ModelDescriptor,
        warnings: &mut Vec<String>,
    ) -> Extraction {
        let Some(doc) = field
            .documentation
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        else {
            return Extraction::default();
        };

        let context = FieldContext {
            model: model.name.clone(),
            field: field.name.clone(),
            type_name: field.type_name.clone(),
            is_optional: !field.is_required,
            is_list: field.is_list,
        };

        match self.ctx.annotations.extract_field(doc, &context) {
            Ok(extraction) => {
                for diagnostic in &extraction.diagnostics {
                    tracing::warn!(
                        target: "schemaforge::mapper",
                        model = %model.name,
                        field = %field.name,
                        diagnostic = %diagnostic,
                        "Ignoring malformed annotation"
                    );
                    warnings.push(format!("Annotation ignored: {diagnostic}"));
                }
                extraction
            }
            Err(e) => {
                tracing::warn!(
                    target: "schemaforge::mapper",
                    model = %model.name,
                    field = %field.name,
                    error = %e,
                    "Annotation extraction failed"
                );
                warnings.push(format!("Annotation extraction failed: {e}"));
                Extraction {
                    description: Some(doc.trim().to_string()),
                    ..Extraction::default()
                }
            }
        }
    }

    fn map_kind(&self, field: &FieldDescriptor, model: &ModelDescriptor) -> Result<TypeExpression> {
        let config = self.ctx.config;
        match &field.kind {
            FieldKind::Scalar(kind) => match kind {
                ScalarKind::Decimal => decimal::map_decimal(field, model, config),
                ScalarKind::DateTime => datetime::map_datetime(field, model, config),
                ScalarKind::Json => Ok(json::map_json(field, model, config)),
                ScalarKind::Bytes => bytes::map_bytes(field, model, config),
                _ => scalar::map_simple(*kind, field, model, config),
            },
            FieldKind::CustomScalar => scalar::map_custom(field, config),
            FieldKind::Enum => {
                if field.type_name.is_empty() {
                    return Err(Error::field_mapping(
                        &model.name,
                        &field.name,
                        "enum type name is empty",
                    ));
                }
                let (names, warning) = self
                    .ctx
                    .names_or_conventional(EntityKind::Enum, &field.type_name);
                let mut out = TypeExpression::new(Expr::reference(&names.schema_symbol))
                    .import(Import::Enum(names.schema_symbol));
                out.warnings.extend(warning);
                Ok(out)
            }
            FieldKind::Relation(info) => {
                if info.related_model.is_empty() {
                    return Err(Error::field_mapping(
                        &model.name,
                        &field.name,
                        "relation target is empty",
                    ));
                }
                let (names, warning) = self
                    .ctx
                    .names_or_conventional(EntityKind::Model, &info.related_model);
                let mut out = TypeExpression::new(Expr::deferred(&names.schema_symbol))
                    .import(Import::Model(names.schema_symbol));
                out.warnings.extend(warning);
                out.notes.push(format!(
                    "{:?} relation ({})",
                    info.role(),
                    info.kind(field.is_list).label()
                ));
                Ok(out)
            }
            FieldKind::Unsupported => {
                let mut out = TypeExpression::new(Expr::call(config.fallback_expression()));
                out.warnings.push(format!(
                    "Unsupported field kind for `{}` ({})",
                    field.name, field.type_name
                ));
                out.fallback = true;
                Ok(out)
            }
        }
    }
}

/// Append the resolver's `modifier` unless the expression already covers it.
///
/// `.nullish()` covers both `undefined` and `null`; `.default()` covers
/// `undefined`. A partial cover is widened to a single trailing `.nullish()`.
/// Returns a note when the chain was left alone or widened.
fn apply_optionality(expression: &mut Expr, modifier: &Modifier) -> Option<String> {
    if expression.has_modifier(&modifier.name) {
        return Some(format!(
            "Skipped .{}() already covered by the expression",
            modifier.name
        ));
    }
    if !modifier.is_optionality() {
        if modifier.is_default() && expression.has_modifier("default") {
            return Some("Skipped .default() already covered by the expression".to_string());
        }
        expression.push(modifier.clone());
        return None;
    }

    let nullish = expression.has_modifier("nullish");
    let accepts_undefined =
        nullish || expression.has_modifier("optional") || expression.has_modifier("default");
    let accepts_null = nullish || expression.has_modifier("nullable");
    let (needs_undefined, needs_null) = match modifier.name.as_str() {
        "optional" => (true, false),
        "nullable" => (false, true),
        _ => (true, true),
    };
    if (!needs_undefined || accepts_undefined) && (!needs_null || accepts_null) {
        return Some(format!(
            "Skipped .{}() already covered by the expression",
            modifier.name
        ));
    }
    if !expression.has_optionality() {
        expression.push(modifier.clone());
        return None;
    }

    let replaced = expression.take_modifiers(Modifier::is_optionality);
    expression.push(Modifier::bare("nullish"));
    let replaced: Vec<String> = replaced.iter().map(|m| format!(".{}()", m.name)).collect();
    Some(format!(
        "Widened {} to .nullish() to honor .{}()",
        replaced.join(""),
        modifier.name
    ))
}

/// Map one field with the given context.
pub fn map_field(
    field: &FieldDescriptor,
    model: &ModelDescriptor,
    ctx: MapperContext<'_>,
) -> FieldMappingResult {
    TypeMapper::new(ctx).map(field, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaforge_core::{
        AnnotationExtractor, BytesConfig, CommentAnnotationExtractor, DecimalConfig, DecimalMode,
        DefaultValue, OptionalFieldBehavior, PatternNamingResolver, RelationInfo,
    };

    struct FailingExtractor;

    impl AnnotationExtractor for FailingExtractor {
        fn extract_field(&self, _: &str, context: &FieldContext) -> Result<Extraction> {
            Err(Error::annotation(&context.field, "boom"))
        }

        fn extract_model(&self, _: &str, model: &str) -> Result<Extraction> {
            Err(Error::annotation(model, "boom"))
        }
    }

    fn map_with(config: &GeneratorConfig, field: FieldDescriptor) -> FieldMappingResult {
        let naming = PatternNamingResolver::default();
        let annotations = CommentAnnotationExtractor::new();
        let ctx = MapperContext::new(config, &naming, &annotations);
        let model = ModelDescriptor::new("Post").field(field.clone());
        map_field(&field, &model, ctx)
    }

    fn map(field: FieldDescriptor) -> FieldMappingResult {
        map_with(&GeneratorConfig::default(), field)
    }

    #[test]
    fn test_canonical_int() {
        let result = map(FieldDescriptor::scalar("views", "Int"));
        assert_eq!(result.expression.to_string(), "z.number().int()");
        assert!(result.warnings.is_empty());
        assert!(!result.is_fallback);
        assert!(result.imports.contains(&Import::Zod));
    }

    #[test]
    fn test_list_wrapped_once_before_merge() {
        let result = map(
            FieldDescriptor::scalar("tags", "String")
                .list()
                .doc("@zod.max(5)"),
        );
        assert_eq!(result.expression.to_string(), "z.array(z.string()).max(5)");
        assert_eq!(result.directives_applied, 1);
    }

    #[test]
    fn test_element_directive_on_list() {
        let result = map(
            FieldDescriptor::scalar("tags", "String")
                .list()
                .doc("@zod.element.min(1)"),
        );
        assert_eq!(result.expression.to_string(), "z.array(z.string().min(1))");
    }

    #[test]
    fn test_full_replacement_skips_dispatch() {
        let result = map(
            FieldDescriptor::scalar("website", "Int")
                .optional()
                .doc("Homepage\n@zod.custom.use(z.string().url())\n@zod.max(10)"),
        );
        assert_eq!(result.expression.to_string(), "z.string().url().optional()");
        assert_eq!(result.description.as_deref(), Some("Homepage"));
        assert!(result.notes.iter().any(|n| n.contains("ignored after full replacement")));
    }

    #[test]
    fn test_structure_replacement() {
        let field = FieldDescriptor::scalar("address", "Json")
            .doc(r#"@zod.custom({"city": "x"})"#);
        let result = map(field);
        assert_eq!(
            result.expression.to_string(),
            "z.object({ city: z.string() })"
        );
    }

    #[test]
    fn test_enum_reference() {
        let result = map(FieldDescriptor::enumeration("role", "Role"));
        assert_eq!(result.expression.to_string(), "RoleSchema");
        assert!(result.imports.contains(&Import::Enum("RoleSchema".to_string())));
    }

    #[test]
    fn test_relations_are_deferred() {
        let forward = map(FieldDescriptor::relation(
            "author",
            RelationInfo::new("User").from_fields(["authorId"]),
        ));
        assert_eq!(forward.expression.to_string(), "z.lazy(() => UserSchema)");

        let comments = FieldDescriptor::relation("comments", RelationInfo::new("Comment"));
        let back = map(comments.list());
        assert_eq!(
            back.expression.to_string(),
            "z.array(z.lazy(() => CommentSchema)).optional()"
        );
        assert!(back.imports.contains(&Import::Model("CommentSchema".to_string())));
    }

    #[test]
    fn test_optional_directive_deduplicated_for_relations() {
        let result = map(
            FieldDescriptor::relation("comments", RelationInfo::new("Comment"))
                .list()
                .doc("@zod.optional()"),
        );
        assert_eq!(
            result.expression.to_string(),
            "z.array(z.lazy(() => CommentSchema)).optional()"
        );
    }

    #[test]
    fn test_directive_default_suppresses_literal_default() {
        let result = map(
            FieldDescriptor::scalar("status", "String")
                .with_default(DefaultValue::literal("draft"))
                .doc("@zod.default(\"published\")"),
        );
        assert_eq!(
            result.expression.to_string(),
            "z.string().default(\"published\")"
        );
    }

    #[test]
    fn test_unsupported_kind_falls_back() {
        let field =
            FieldDescriptor::new("blob", FieldKind::Unsupported, "Unsupported(\"tsvector\")");
        let result = map(field);
        assert_eq!(result.expression.to_string(), "z.unknown()");
        assert!(result.is_fallback);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_invalid_custom_mapping_degrades() {
        let config = GeneratorConfig::default().custom_type("Geometry", "z.string(");
        let field = FieldDescriptor::scalar("shape", "Geometry").optional();
        let result = map_with(&config, field);
        assert_eq!(result.expression.to_string(), "z.unknown().optional()");
        assert!(result.is_fallback);
    }

    #[test]
    fn test_extraction_failure_is_warning() {
        let config = GeneratorConfig::default();
        let naming = PatternNamingResolver::default();
        let ctx = MapperContext::new(&config, &naming, &FailingExtractor);
        let field = FieldDescriptor::scalar("email", "String").doc("@zod.email()");
        let model = ModelDescriptor::new("User").field(field.clone());
        let result = map_field(&field, &model, ctx);
        assert_eq!(result.expression.to_string(), "z.string()");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.description.as_deref(), Some("@zod.email()"));
    }

    #[test]
    fn test_decimal_mode_special_handling() {
        let config = GeneratorConfig::default().decimal(DecimalConfig {
            mode: DecimalMode::Decimal,
            ..DecimalConfig::default()
        });
        let result = map_with(&config, FieldDescriptor::scalar("price", "Decimal"));
        assert!(result.requires_special_handling);
        assert!(result.imports.contains(&Import::Prisma));
    }

    #[test]
    fn test_database_notes_only_when_enabled() {
        let field = FieldDescriptor::scalar("payload", "Json");
        assert!(map(field.clone()).database_notes.is_empty());
        let config = GeneratorConfig::default().database_validation(true);
        assert_eq!(map_with(&config, field).database_notes.len(), 1);
    }

    #[test]
    fn test_nullable_directive_widened_for_nullish_behavior() {
        let config = GeneratorConfig::default()
            .optional_field_behavior(OptionalFieldBehavior::Nullish);
        let result = map_with(
            &config,
            FieldDescriptor::scalar("bio", "String")
                .optional()
                .doc("@zod.nullable()"),
        );
        assert!(result.optionality.is_optional);
        assert_eq!(result.expression.to_string(), "z.string().nullish()");
        assert!(result.notes.iter().any(|n| n.contains("Widened .nullable()")));
    }

    #[test]
    fn test_nullish_directive_covers_nullable_behavior() {
        let config = GeneratorConfig::default()
            .optional_field_behavior(OptionalFieldBehavior::Nullable);
        let result = map_with(
            &config,
            FieldDescriptor::scalar("bio", "String")
                .optional()
                .doc("@zod.nullish()"),
        );
        assert_eq!(result.expression.to_string(), "z.string().nullish()");
        assert!(result.notes.iter().any(|n| n.contains("Skipped .nullable()")));
    }

    #[test]
    fn test_nullable_directive_kept_for_nullable_behavior() {
        let config = GeneratorConfig::default()
            .optional_field_behavior(OptionalFieldBehavior::Nullable);
        let result = map_with(
            &config,
            FieldDescriptor::scalar("bio", "String")
                .optional()
                .doc("@zod.nullable()"),
        );
        assert_eq!(result.expression.to_string(), "z.string().nullable()");
    }

    #[test]
    fn test_oversized_bytes_bound_falls_back() {
        let config = GeneratorConfig::default().bytes(BytesConfig {
            max_size: Some(u64::MAX),
            ..BytesConfig::default()
        });
        let result = map_with(&config, FieldDescriptor::scalar("avatar", "Bytes"));
        assert!(result.is_fallback);
        assert_eq!(result.expression.to_string(), "z.unknown()");
        assert!(result.warnings.iter().any(|w| w.contains("maxSize")));
    }

    #[test]
    fn test_merge_failure_keeps_base_expression() {
        let result = map(FieldDescriptor::scalar("title", "String").doc("@zod.element.min(1)"));
        assert_eq!(result.expression.to_string(), "z.string()");
        let merge_warnings = result
            .warnings
            .iter()
            .filter(|w| w.starts_with("Annotation merge failed"))
            .count();
        assert_eq!(merge_warnings, 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(!result.is_fallback);
        assert_eq!(result.directives_applied, 0);
    }
}
