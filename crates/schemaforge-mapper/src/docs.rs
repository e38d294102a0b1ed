//! Generated field documentation and provider notes.

use schemaforge_core::{
    Base, DatabaseProvider, Expr, FieldDescriptor, FieldKind, GeneratorConfig, ScalarKind,
};

/// Authorship stamp appended to generated field documentation.
pub const GENERATED_STAMP: &str = "@generated schemaforge";

/// Summary of the constraint modifiers on an expression (`min(1), email()`).
///
/// Optionality and default modifiers are not constraints and are skipped.
pub fn validation_summary(expr: &Expr) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Base::Array(inner) = &expr.base {
        parts.extend(
            constraint_names(inner)
                .into_iter()
                .map(|name| format!("element {name}")),
        );
    }
    parts.extend(constraint_names(expr));
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn constraint_names(expr: &Expr) -> Vec<String> {
    expr.modifiers
        .iter()
        .filter(|m| !m.is_optionality() && !m.is_default())
        .map(|m| {
            if m.args.is_empty() || m.args.len() > 24 {
                format!("{}()", m.name)
            } else {
                format!("{}({})", m.name, m.args)
            }
        })
        .collect()
}

/// A representative input value for the field's declared type.
pub fn example_value(field: &FieldDescriptor) -> Option<String> {
    let base = match field.kind {
        FieldKind::Scalar(kind) => match kind {
            ScalarKind::String => "\"example\"",
            ScalarKind::Int => "42",
            ScalarKind::BigInt => "BigInt(42)",
            ScalarKind::Float => "3.14",
            ScalarKind::Decimal => "\"99.99\"",
            ScalarKind::Boolean => "true",
            ScalarKind::DateTime => "\"2024-01-01T00:00:00.000Z\"",
            ScalarKind::Json => "{ \"key\": \"value\" }",
            ScalarKind::Bytes => "\"SGVsbG8=\"",
        },
        _ => return None,
    };
    Some(if field.is_list {
        format!("[{base}]")
    } else {
        base.to_string()
    })
}

/// Assemble the documentation attached to a field.
pub fn field_documentation(
    field: &FieldDescriptor,
    description: Option<&str>,
    expression: &Expr,
) -> String {
    let mut lines = Vec::new();
    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        lines.push(description.trim().to_string());
    }

    if let Some(info) = field.relation_info() {
        let mut line = format!(
            "Relation: {} with {}",
            info.kind(field.is_list).label(),
            info.related_model
        );
        if let Some(name) = &info.relation_name {
            line.push_str(&format!(" ({name})"));
        }
        if info.owns_foreign_keys() {
            line.push_str(&format!(
                " via {} -> {}",
                info.from_fields.join(", "),
                info.references.join(", ")
            ));
        }
        lines.push(line);
    }

    if let Some(summary) = validation_summary(expression) {
        lines.push(format!("Validations: {summary}"));
    }

    let mut flags = Vec::new();
    if field.is_id {
        flags.push("@id".to_string());
    }
    if field.is_unique {
        flags.push("@unique".to_string());
    }
    if field.is_updated_at {
        flags.push("@updatedAt".to_string());
    }
    if let Some(default) = &field.default {
        flags.push(format!("@default({})", default.describe()));
    }
    if !flags.is_empty() {
        lines.push(flags.join(" "));
    }

    if let Some(example) = example_value(field) {
        lines.push(format!("@example {example}"));
    }
    lines.push(GENERATED_STAMP.to_string());
    lines.join("\n")
}

/// Provider-specific storage notes. Informational only.
pub fn database_notes(field: &FieldDescriptor, config: &GeneratorConfig) -> Vec<String> {
    let provider = config.provider;
    let mut notes = Vec::new();

    if let Some(kind) = field.scalar_kind() {
        let note = match (provider, kind) {
            (DatabaseProvider::Mysql, ScalarKind::Decimal) => {
                Some("DECIMAL precision is limited to 65 digits")
            }
            (DatabaseProvider::Sqlite, ScalarKind::Decimal) => {
                Some("Stored with REAL affinity; precision is not guaranteed")
            }
            (DatabaseProvider::Mongodb, ScalarKind::Decimal) => Some("Stored as Decimal128"),
            (DatabaseProvider::Mysql, ScalarKind::DateTime) => {
                Some("DATETIME(3) keeps millisecond precision")
            }
            (DatabaseProvider::Sqlite, ScalarKind::DateTime) => {
                Some("Stored as numeric or text timestamps")
            }
            (DatabaseProvider::Sqlserver, ScalarKind::DateTime) => Some("Stored as DATETIME2"),
            (DatabaseProvider::Postgresql | DatabaseProvider::Cockroachdb, ScalarKind::Json) => {
                Some("JSONB column; consider a GIN index for lookups")
            }
            (DatabaseProvider::Mysql, ScalarKind::Json) => Some("Native JSON column"),
            (DatabaseProvider::Sqlite, ScalarKind::Json) => Some("Stored as TEXT"),
            (DatabaseProvider::Postgresql | DatabaseProvider::Cockroachdb, ScalarKind::Bytes) => {
                Some("BYTEA column")
            }
            (DatabaseProvider::Mysql, ScalarKind::Bytes) => Some("LONGBLOB column"),
            (DatabaseProvider::Sqlite, ScalarKind::Bytes) => Some("BLOB column"),
            (DatabaseProvider::Mongodb, ScalarKind::Bytes) => Some("Stored as BinData"),
            (DatabaseProvider::Mysql, ScalarKind::String) if field.is_unique => {
                Some("Unique VARCHAR index keys are limited to 3072 bytes")
            }
            (DatabaseProvider::Sqlserver, ScalarKind::String) if field.is_unique => {
                Some("Unique NVARCHAR index keys are limited to 1700 bytes")
            }
            _ => None,
        };
        if let Some(note) = note {
            notes.push(format!("{}: {note}", provider.display_name()));
        }
    }

    if field.is_unique && !field.is_id {
        notes.push(format!("{}: backed by a unique index", provider.display_name()));
    }
    let native_lists = matches!(
        provider,
        DatabaseProvider::Postgresql | DatabaseProvider::Cockroachdb | DatabaseProvider::Mongodb
    );
    if field.is_list && field.scalar_kind().is_some() && !native_lists {
        notes.push(format!(
            "{}: scalar lists are not natively supported",
            provider.display_name()
        ));
    }
    notes
}
