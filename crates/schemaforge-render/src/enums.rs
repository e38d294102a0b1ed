//! Enum module rendering.

use schemaforge_core::{EntityKind, EnumDescriptor, Error, GeneratorConfig, NamingResolver, Result};

use crate::output::OutputModule;

/// Render one enum into a `z.enum([...])` module.
pub fn render_enum(
    descriptor: &EnumDescriptor,
    config: &GeneratorConfig,
    naming: &dyn NamingResolver,
) -> Result<OutputModule> {
    let render_error = |reason: String| Error::Render {
        model: descriptor.name.clone(),
        reason,
    };

    if descriptor.values.is_empty() {
        return Err(render_error("enum has no values".to_string()));
    }
    let names = naming
        .resolve(EntityKind::Enum, &descriptor.name)
        .map_err(|e| render_error(e.to_string()))?;

    tracing::debug!(
        target: "schemaforge::render",
        name = %descriptor.name,
        values = descriptor.values.len(),
        "Rendering enum module"
    );

    let values = descriptor
        .values
        .iter()
        .map(|v| serde_json::Value::String(v.clone()).to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    if !config.lean {
        if let Some(doc) = descriptor
            .documentation
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            out.push_str("/**\n");
            for line in doc.lines() {
                out.push_str(&format!(" * {}\n", line.trim_end().replace("*/", "*\\/")));
            }
            out.push_str(" */\n");
        }
    }

    let mut module = OutputModule {
        file_name: OutputModule::file_name_for(&names.file_name),
        imports: vec!["z".to_string()],
        ..OutputModule::default()
    };

    let mut content = String::from("import { z } from \"zod\";\n\n");
    content.push_str(&out);
    content.push_str(&format!(
        "export const {} = z.enum([{values}]);\n",
        names.schema_symbol
    ));
    content.push_str(&format!(
        "export type {} = z.infer<typeof {}>;\n",
        names.type_symbol, names.schema_symbol
    ));
    module.exports = vec![names.schema_symbol.clone(), names.type_symbol.clone()];
    module.content = content;
    Ok(module)
}
