//! File content assembly.
//!
//! Renders a [`ModelSchemaComposition`] into an [`OutputModule`], in order:
//! header, import block, model documentation, schema definition, type alias,
//! legacy alias, statistics. Lean mode keeps the schema definition and the
//! aliases byte-for-byte identical and drops everything else.

use schemaforge_core::expr::object_key;
use schemaforge_core::{Error, GeneratorConfig, Import, NamingResolver, Result};
use schemaforge_mapper::{ComposedFieldSchema, GenerationStatistics, ModelSchemaComposition};

use crate::imports::{import_statement, used_imports};
use crate::output::OutputModule;

/// Label of the header line carrying the generation timestamp.
pub const TIMESTAMP_LABEL: &str = "Generated at:";

const INDENT: &str = "  ";

/// Renders compositions into output modules.
#[derive(Clone, Copy)]
pub struct FileAssembler<'a> {
    config: &'a GeneratorConfig,
    naming: &'a dyn NamingResolver,
}

impl std::fmt::Debug for FileAssembler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAssembler")
            .field("lean", &self.config.lean)
            .field("file_header", &self.config.file_header)
            .finish_non_exhaustive()
    }
}

impl<'a> FileAssembler<'a> {
    pub fn new(config: &'a GeneratorConfig, naming: &'a dyn NamingResolver) -> Self {
        Self { config, naming }
    }

    fn documented(&self) -> bool {
        !self.config.lean
    }

    /// Render one composition.
    ///
    /// Fails only when the composition does not export its own schema symbol.
    pub fn render(&self, composition: &ModelSchemaComposition) -> Result<OutputModule> {
        let schema_symbol = composition.schema_symbol();
        if schema_symbol.is_empty() || !composition.exports.iter().any(|e| e == schema_symbol) {
            return Err(Error::Render {
                model: composition.model_name.clone(),
                reason: "composition does not export its schema symbol".to_string(),
            });
        }

        tracing::debug!(
            target: "schemaforge::render",
            model = %composition.model_name,
            fields = composition.fields.len(),
            lean = self.config.lean,
            "Rendering model module"
        );

        let definition = self.schema_definition(composition);
        let code_text = schema_code(composition);

        let mut warnings = Vec::new();
        let used = used_imports(&composition.imports, &code_text, schema_symbol);
        let import_lines: Vec<String> = used
            .iter()
            .map(|import| import_statement(import, self.naming, &mut warnings))
            .collect();
        let dependencies: Vec<String> = used
            .iter()
            .filter_map(|import| import.model_symbol())
            .map(str::to_string)
            .collect();

        let mut out = String::new();
        if self.config.file_header && self.documented() {
            out.push_str(&header(composition));
            out.push('\n');
        }
        for line in &import_lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');

        if self.documented() {
            if let Some(doc) = &composition.documentation {
                out.push_str(&doc_block(doc, ""));
            }
        }
        out.push_str(&definition);
        out.push('\n');

        let names = &composition.names;
        out.push_str(&format!(
            "export type {} = z.infer<typeof {schema_symbol}>;\n",
            names.type_symbol
        ));
        if composition.exports_legacy_alias() {
            out.push('\n');
            if self.documented() {
                out.push_str(&format!("/** @deprecated Use {schema_symbol} instead. */\n"));
            }
            out.push_str(&format!("export const {} = {schema_symbol};\n", names.legacy_symbol));
        }

        if self.documented() {
            out.push('\n');
            out.push_str(&statistics_block(&composition.statistics));
        }

        Ok(OutputModule {
            file_name: OutputModule::file_name_for(&names.file_name),
            content: out,
            imports: used.iter().map(|i| i.identifier().to_string()).collect(),
            exports: composition.exports.clone(),
            dependencies,
            warnings,
        })
    }

    fn schema_definition(&self, composition: &ModelSchemaComposition) -> String {
        let schema_symbol = composition.schema_symbol();
        let chain: String = composition
            .model_validation
            .iter()
            .map(ToString::to_string)
            .collect();

        if composition.fields.is_empty() {
            return format!("export const {schema_symbol} = z.object({{}}){chain};\n");
        }

        let mut out = format!("export const {schema_symbol} = z.object({{\n");
        for field in &composition.fields {
            if self.documented() {
                out.push_str(&field_annotations(field));
            }
            out.push_str(&format!(
                "{INDENT}{}: {},\n",
                object_key(&field.name),
                field.expression
            ));
        }
        out.push_str(&format!("}}){chain};\n"));
        out
    }
}

/// Code text that imports are matched against: expressions only, never docs.
fn schema_code(composition: &ModelSchemaComposition) -> String {
    let mut code = String::from("z.object(");
    for field in &composition.fields {
        code.push_str(&format!("{}, ", field.expression));
    }
    code.push(')');
    for modifier in &composition.model_validation {
        code.push_str(&modifier.to_string());
    }
    code
}

fn header(composition: &ModelSchemaComposition) -> String {
    let metadata = &composition.metadata;
    let mut out = String::from("/**\n");
    out.push_str(&format!(
        " * Validation schema for the {} model.\n",
        composition.model_name
    ));
    out.push_str(" *\n");
    out.push_str(&format!(" * {TIMESTAMP_LABEL} {}\n", metadata.generated_at));
    out.push_str(&format!(" * Generator version: {}\n", metadata.generator_version));
    out.push_str(&format!(
        " * Configuration fingerprint: {}\n",
        metadata.config_fingerprint
    ));
    out.push_str(" *\n");
    out.push_str(" * @generated by schemaforge. Do not edit by hand.\n");
    out.push_str(" */\n");
    out
}

fn doc_block(text: &str, indent: &str) -> String {
    let mut out = format!("{indent}/**\n");
    for line in text.lines() {
        let line = line.trim_end().replace("*/", "*\\/");
        if line.is_empty() {
            out.push_str(&format!("{indent} *\n"));
        } else {
            out.push_str(&format!("{indent} * {line}\n"));
        }
    }
    out.push_str(&format!("{indent} */\n"));
    out
}

fn field_annotations(field: &ComposedFieldSchema) -> String {
    let mut out = String::new();
    if let Some(doc) = field
        .documentation
        .as_deref()
        .filter(|d| !d.trim().is_empty())
    {
        out.push_str(&doc_block(doc, INDENT));
    }
    for note in &field.notes {
        out.push_str(&format!("{INDENT}// {note}\n"));
    }
    for note in &field.database_notes {
        out.push_str(&format!("{INDENT}// db: {note}\n"));
    }
    for warning in &field.warnings {
        out.push_str(&format!("{INDENT}// warning: {warning}\n"));
    }
    out
}

fn statistics_block(stats: &GenerationStatistics) -> String {
    let rows = [
        ("Total fields", stats.total_fields),
        ("Processed", stats.processed_fields),
        ("With validations", stats.validated_fields),
        ("Enhanced by annotations", stats.enhanced_fields),
        ("Relations", stats.relation_fields),
        ("Complex types", stats.complex_type_fields),
        ("Fallbacks", stats.fallback_fields),
    ];
    let mut out = String::from("/*\n * Statistics\n");
    for (label, value) in rows {
        out.push_str(&format!(" *   {label:<24} {value}\n"));
    }
    out.push_str(" */\n");
    out
}

/// Whether a composition's rendered module would import `import`.
pub fn references_import(composition: &ModelSchemaComposition, import: &Import) -> bool {
    crate::imports::references_identifier(&schema_code(composition), import.identifier())
}
