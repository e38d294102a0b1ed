//! Fixed-expression scalars and custom scalar types.

use schemaforge_core::{
    BigIntFormat, Expr, FieldDescriptor, GeneratorConfig, ModelDescriptor, Result, ScalarKind,
};

use super::{TypeExpression, regex_modifier};

/// Integer digits, optionally signed.
pub const BIGINT_STRING_PATTERN: &str = r"^-?\d+$";

/// Map a scalar whose expression does not depend on a strategy.
pub(crate) fn map_simple(
    kind: ScalarKind,
    field: &FieldDescriptor,
    model: &ModelDescriptor,
    config: &GeneratorConfig,
) -> Result<TypeExpression> {
    let json = &config.json_schema;
    let out = match kind {
        ScalarKind::String => TypeExpression::new(Expr::call("z.string")),
        ScalarKind::Int => TypeExpression::new(Expr::call("z.number").with("int", "")),
        ScalarKind::Float => TypeExpression::new(Expr::call("z.number")),
        ScalarKind::Boolean => TypeExpression::new(Expr::call("z.boolean")),
        ScalarKind::BigInt if json.enabled => match json.big_int_format {
            BigIntFormat::String => {
                let mut expr = Expr::call("z.string");
                expr.push(regex_modifier(
                    BIGINT_STRING_PATTERN,
                    &format!("{}.{} must be an integer string", model.name, field.name),
                    config,
                )?);
                let mut out = TypeExpression::new(expr);
                out.notes
                    .push("JSON Schema compatibility: BigInt rendered as string".to_string());
                out
            }
            BigIntFormat::Number => {
                let mut out = TypeExpression::new(Expr::call("z.number").with("int", ""));
                out.warnings.push(format!(
                    "BigInt field `{}` rendered as number; values beyond 2^53 lose precision",
                    field.name
                ));
                out
            }
        },
        ScalarKind::BigInt => TypeExpression::new(Expr::call("z.bigint")),
        ScalarKind::Decimal | ScalarKind::DateTime | ScalarKind::Json | ScalarKind::Bytes => {
            return Err(schemaforge_core::Error::field_mapping(
                &model.name,
                &field.name,
                format!("{} requires a strategy mapper", kind.type_name()),
            ));
        }
    };
    Ok(out)
}

/// Map a scalar type name that is not built in.
pub(crate) fn map_custom(
    field: &FieldDescriptor,
    config: &GeneratorConfig,
) -> Result<TypeExpression> {
    if let Some(mapping) = config.custom_type_mappings.get(&field.type_name) {
        let mut out = TypeExpression::new(Expr::parse(mapping)?);
        out.notes
            .push(format!("Custom type mapping for {}", field.type_name));
        return Ok(out);
    }

    let mut out = TypeExpression::new(Expr::call("z.string"));
    out.warnings.push(format!(
        "Unknown type `{}` for field `{}`, defaulting to string",
        field.type_name, field.name
    ));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaforge_core::JsonSchemaCompat;

    fn map(type_name: &str, config: &GeneratorConfig) -> TypeExpression {
        let field = FieldDescriptor::scalar("value", type_name);
        let model = ModelDescriptor::new("Sample").field(field.clone());
        let kind = field.scalar_kind().unwrap();
        map_simple(kind, &field, &model, config).unwrap()
    }

    #[test]
    fn test_canonical_expressions() {
        let config = GeneratorConfig::default();
        assert_eq!(map("String", &config).expr.to_string(), "z.string()");
        assert_eq!(map("Int", &config).expr.to_string(), "z.number().int()");
        assert_eq!(map("Float", &config).expr.to_string(), "z.number()");
        assert_eq!(map("Boolean", &config).expr.to_string(), "z.boolean()");
        assert_eq!(map("BigInt", &config).expr.to_string(), "z.bigint()");
    }

    #[test]
    fn test_bigint_json_schema_formats() {
        let config = GeneratorConfig::default().json_schema(JsonSchemaCompat {
            enabled: true,
            ..JsonSchemaCompat::default()
        });
        assert!(map("BigInt", &config)
            .expr
            .to_string()
            .starts_with(r"z.string().regex(/^-?\d+$/"));

        let config = GeneratorConfig::default().json_schema(JsonSchemaCompat {
            enabled: true,
            big_int_format: BigIntFormat::Number,
            ..JsonSchemaCompat::default()
        });
        let out = map("BigInt", &config);
        assert_eq!(out.expr.to_string(), "z.number().int()");
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_custom_type_mapping() {
        let config = GeneratorConfig::default().custom_type("Geometry", "z.string().min(1)");
        let field = FieldDescriptor::scalar("shape", "Geometry");
        let out = map_custom(&field, &config).unwrap();
        assert_eq!(out.expr.to_string(), "z.string().min(1)");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_unknown_custom_type_falls_back_to_string() {
        let field = FieldDescriptor::scalar("shape", "Geometry");
        let out = map_custom(&field, &GeneratorConfig::default()).unwrap();
        assert_eq!(out.expr.to_string(), "z.string()");
        assert_eq!(out.warnings.len(), 1);
    }
}
