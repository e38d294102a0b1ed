//! Model composition.
//!
//! The [`ModelComposer`] maps every field of one model, aggregates imports,
//! exports and statistics, and stamps the result with generation metadata.
//! A failing field is replaced by a fallback field; only an unusable model
//! name fails the whole composition.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use schemaforge_core::{
    Directive, EntityKind, Error, Expr, FieldDescriptor, Import, Modifier, ModelDescriptor,
    ResolvedName, Result,
};

use crate::context::MapperContext;
use crate::docs::validation_summary;
use crate::optionality::{OptionalityReason, is_auto_generated};
use crate::type_mapper::{FieldMappingResult, TypeMapper};

/// One field of a composed model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedFieldSchema {
    pub name: String,
    pub expression: Expr,
    pub imports: BTreeSet<Import>,
    pub documentation: Option<String>,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
    pub database_notes: Vec<String>,
    pub optionality: OptionalityReason,
    pub is_relation: bool,
    pub is_list: bool,
    pub is_optional: bool,
    pub has_default_value: bool,
    pub is_auto_generated: bool,
    pub requires_special_handling: bool,
    pub directives_applied: usize,
    pub is_fallback: bool,
}

impl ComposedFieldSchema {
    fn from_mapping(field: &FieldDescriptor, mapping: FieldMappingResult) -> Self {
        Self {
            name: field.name.clone(),
            expression: mapping.expression,
            imports: mapping.imports,
            documentation: mapping.documentation,
            notes: mapping.notes,
            warnings: mapping.warnings,
            database_notes: mapping.database_notes,
            optionality: mapping.optionality.reason,
            is_relation: field.is_relation(),
            is_list: field.is_list,
            is_optional: mapping.optionality.is_optional,
            has_default_value: field.has_default_value,
            is_auto_generated: is_auto_generated(field),
            requires_special_handling: mapping.requires_special_handling,
            directives_applied: mapping.directives_applied,
            is_fallback: mapping.is_fallback,
        }
    }
}

/// Per-model field counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStatistics {
    pub total_fields: usize,
    /// Fields mapped without falling back.
    pub processed_fields: usize,
    /// Fields carrying at least one constraint.
    pub validated_fields: usize,
    /// Fields changed by annotation directives.
    pub enhanced_fields: usize,
    pub relation_fields: usize,
    /// Decimal, DateTime, Json and Bytes fields.
    pub complex_type_fields: usize,
    pub fallback_fields: usize,
}

impl GenerationStatistics {
    fn record(&mut self, field: &FieldDescriptor, composed: &ComposedFieldSchema) {
        self.total_fields += 1;
        if composed.is_fallback {
            self.fallback_fields += 1;
        } else {
            self.processed_fields += 1;
        }
        if validation_summary(&composed.expression).is_some() {
            self.validated_fields += 1;
        }
        if composed.directives_applied > 0 {
            self.enhanced_fields += 1;
        }
        if composed.is_relation {
            self.relation_fields += 1;
        }
        if field.scalar_kind().is_some_and(|k| k.is_complex()) {
            self.complex_type_fields += 1;
        }
    }
}

/// When, by what, and under which configuration a composition was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationMetadata {
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
    pub generator_version: String,
    pub config_fingerprint: String,
}

/// The composed schema of one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSchemaComposition {
    pub model_name: String,
    pub names: ResolvedName,
    pub documentation: Option<String>,
    pub fields: Vec<ComposedFieldSchema>,
    pub imports: BTreeSet<Import>,
    /// Exported symbols: schema, type alias and, unless disabled, the legacy
    /// alias. No duplicates.
    pub exports: Vec<String>,
    /// Chain applied after `z.object({...})`.
    pub model_validation: Vec<Modifier>,
    pub statistics: GenerationStatistics,
    pub metadata: GenerationMetadata,
    pub warnings: Vec<String>,
}

impl ModelSchemaComposition {
    /// The model's schema symbol.
    #[must_use]
    pub fn schema_symbol(&self) -> &str {
        &self.names.schema_symbol
    }

    /// Whether the legacy alias is exported.
    #[must_use]
    pub fn exports_legacy_alias(&self) -> bool {
        self.exports.contains(&self.names.legacy_symbol)
            && self.names.legacy_symbol != self.names.schema_symbol
    }
}

/// Composes model descriptors into schema compositions.
#[derive(Debug, Clone, Copy)]
pub struct ModelComposer<'a> {
    ctx: MapperContext<'a>,
}

impl<'a> ModelComposer<'a> {
    pub fn new(ctx: MapperContext<'a>) -> Self {
        Self { ctx }
    }

    /// Compose one model.
    pub fn compose(&self, model: &ModelDescriptor) -> Result<ModelSchemaComposition> {
        let config = self.ctx.config;
        tracing::debug!(
            target: "schemaforge::mapper",
            model = %model.name,
            fields = model.fields.len(),
            "Composing model"
        );

        if model.name.trim().is_empty() {
            return Err(Error::composition(&model.name, "model name is empty"));
        }
        let names = self
            .ctx
            .naming
            .resolve(EntityKind::Model, &model.name)
            .map_err(|e| Error::composition(&model.name, e.to_string()))?;

        let mut warnings = Vec::new();
        let (documentation, model_validation) = self.model_directives(model, &mut warnings);

        let mapper = TypeMapper::new(self.ctx);
        let mut fields = Vec::with_capacity(model.fields.len());
        let mut statistics = GenerationStatistics::default();
        let mut imports = BTreeSet::from([Import::Zod]);
        let mut seen = HashSet::new();

        for field in &model.fields {
            if !config.include_relations && field.is_relation() {
                tracing::trace!(
                    target: "schemaforge::mapper",
                    model = %model.name,
                    field = %field.name,
                    "Skipping relation field"
                );
                continue;
            }

            let composed = match self.compose_field(&mapper, field, model, &mut seen) {
                Ok(composed) => composed,
                Err(e) => {
                    tracing::warn!(
                        target: "schemaforge::mapper",
                        model = %model.name,
                        field = %field.name,
                        error = %e,
                        "Field composition failed, substituting fallback"
                    );
                    ComposedFieldSchema::from_mapping(field, mapper.fallback(field, model, &e))
                }
            };

            statistics.record(field, &composed);
            imports.extend(composed.imports.iter().cloned());
            for warning in &composed.warnings {
                warnings.push(format!("{}: {warning}", composed.name));
            }
            fields.push(composed);
        }

        let mut exports = vec![names.schema_symbol.clone()];
        let mut secondary = vec![&names.type_symbol];
        if config.legacy_aliases {
            secondary.push(&names.legacy_symbol);
        }
        for symbol in secondary {
            if !exports.contains(symbol) {
                exports.push(symbol.clone());
            }
        }

        let metadata = GenerationMetadata {
            generated_at: chrono::Utc::now().to_rfc3339(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            config_fingerprint: config.fingerprint(),
        };

        tracing::debug!(
            target: "schemaforge::mapper",
            model = %model.name,
            total = statistics.total_fields,
            fallback = statistics.fallback_fields,
            "Composed model"
        );

        Ok(ModelSchemaComposition {
            model_name: model.name.clone(),
            names,
            documentation,
            fields,
            imports,
            exports,
            model_validation,
            statistics,
            metadata,
            warnings,
        })
    }

    fn compose_field(
        &self,
        mapper: &TypeMapper<'_>,
        field: &FieldDescriptor,
        model: &ModelDescriptor,
        seen: &mut HashSet<String>,
    ) -> Result<ComposedFieldSchema> {
        if field.name.trim().is_empty() {
            return Err(Error::field_mapping(&model.name, &field.name, "field name is empty"));
        }
        if !seen.insert(field.name.clone()) {
            return Err(Error::field_mapping(&model.name, &field.name, "duplicate field name"));
        }
        let mapping = mapper.map(field, model);
        Ok(ComposedFieldSchema::from_mapping(field, mapping))
    }

    fn model_directives(
        &self,
        model: &ModelDescriptor,
        warnings: &mut Vec<String>,
    ) -> (Option<String>, Vec<Modifier>) {
        let Some(doc) = model
            .documentation
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        else {
            return (None, Vec::new());
        };

        match self.ctx.annotations.extract_model(doc, &model.name) {
            Ok(extraction) => {
                for diagnostic in extraction.diagnostics {
                    tracing::warn!(
                        target: "schemaforge::mapper",
                        model = %model.name,
                        diagnostic = %diagnostic,
                        "Ignoring malformed model annotation"
                    );
                    warnings.push(format!("Model annotation ignored: {diagnostic}"));
                }
                let modifiers = extraction
                    .directives
                    .into_iter()
                    .flat_map(|d| match d {
                        Directive::Chain { modifiers, .. } => modifiers,
                        _ => Vec::new(),
                    })
                    .collect();
                (extraction.description, modifiers)
            }
            Err(e) => {
                tracing::warn!(
                    target: "schemaforge::mapper",
                    model = %model.name,
                    error = %e,
                    "Model annotation extraction failed"
                );
                warnings.push(format!("Model annotation extraction failed: {e}"));
                (Some(doc.trim().to_string()), Vec::new())
            }
        }
    }
}
