//! `Json` strategies.

use schemaforge_core::{Expr, FieldDescriptor, GeneratorConfig, JsonMode, ModelDescriptor};

use super::{TypeExpression, message_params};

pub(crate) fn map_json(
    field: &FieldDescriptor,
    model: &ModelDescriptor,
    config: &GeneratorConfig,
) -> TypeExpression {
    let json = &config.json;
    let subject = format!("{}.{}", model.name, field.name);

    let mut expr = match json.mode {
        JsonMode::Unknown => Expr::call("z.unknown"),
        JsonMode::Any => Expr::call("z.any"),
        JsonMode::Record => {
            let record = Expr::call_with("z.record", "z.string(), z.unknown()");
            if json.allow_null {
                record.with("nullable", "")
            } else {
                record
            }
        }
    };

    let mut notes = Vec::new();
    let mut special = false;

    if !json.allow_null && json.mode != JsonMode::Record {
        let msg = format!("{subject} must not be null");
        expr = expr.with(
            "refine",
            format!("(v) => v !== null, {}", message_params(config, &msg)),
        );
        special = true;
    } else if json.allow_null {
        notes.push("JSON null admitted".to_string());
    }

    if let Some(depth) = json.max_depth {
        let msg = format!("{subject} exceeds maximum nesting depth {depth}");
        expr = expr.with(
            "refine",
            format!(
                "(v) => {{ const within = (x, d) => x === null || typeof x !== \"object\" || (d < {depth} && Object.values(x).every((c) => within(c, d + 1))); return within(v, 0); }}, {}",
                message_params(config, &msg)
            ),
        );
        notes.push(format!("Maximum nesting depth {depth}"));
        special = true;
    }

    if let Some(length) = json.max_length {
        let msg = format!("{subject} exceeds maximum serialized length {length}");
        expr = expr.with(
            "refine",
            format!(
                "(v) => JSON.stringify(v ?? null).length <= {length}, {}",
                message_params(config, &msg)
            ),
        );
        notes.push(format!("Maximum serialized length {length}"));
        special = true;
    }

    let mut out = TypeExpression::new(expr);
    out.notes = notes;
    out.special = special;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaforge_core::JsonConfig;

    fn map(json: JsonConfig) -> TypeExpression {
        let config = GeneratorConfig::default().json(json);
        let field = FieldDescriptor::scalar("meta", "Json");
        let model = ModelDescriptor::new("Event").field(field.clone());
        map_json(&field, &model, &config)
    }

    #[test]
    fn test_default_unknown() {
        let out = map(JsonConfig::default());
        assert_eq!(out.expr.to_string(), "z.unknown()");
        assert!(out.expr.is_permissive());
        assert!(!out.special);
    }

    #[test]
    fn test_record_mode() {
        let out = map(JsonConfig {
            mode: JsonMode::Record,
            ..JsonConfig::default()
        });
        assert_eq!(
            out.expr.to_string(),
            "z.record(z.string(), z.unknown()).nullable()"
        );

        let out = map(JsonConfig {
            mode: JsonMode::Record,
            allow_null: false,
            ..JsonConfig::default()
        });
        assert_eq!(out.expr.to_string(), "z.record(z.string(), z.unknown())");
    }

    #[test]
    fn test_structural_limits() {
        let out = map(JsonConfig {
            mode: JsonMode::Any,
            allow_null: false,
            max_depth: Some(3),
            max_length: Some(1024),
        });
        let text = out.expr.to_string();
        assert!(text.starts_with("z.any().refine((v) => v !== null"));
        assert!(text.contains("d < 3"));
        assert!(text.contains("JSON.stringify(v ?? null).length <= 1024"));
        assert!(out.special);
        assert_eq!(out.expr.modifiers.len(), 3);
    }
}
