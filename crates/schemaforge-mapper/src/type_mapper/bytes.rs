//! `Bytes` strategies.

use schemaforge_core::{
    BytesFormat, BytesRepresentation, Error, Expr, FieldDescriptor, GeneratorConfig,
    ModelDescriptor, Result,
};

use super::{TypeExpression, message_params, regex_modifier};

/// Standard base64 alphabet with padding.
pub const BASE64_PATTERN: &str = r"^[A-Za-z0-9+/]*={0,2}$";

/// Hexadecimal digits.
pub const HEX_PATTERN: &str = r"^[0-9a-fA-F]*$";

/// Base64 length in characters for `bytes` decoded bytes: `ceil(bytes * 4 / 3)`.
///
/// `None` when the length does not fit in a `u64`.
#[must_use]
pub const fn base64_length(bytes: u64) -> Option<u64> {
    match bytes.checked_mul(4) {
        Some(quads) => Some(quads.div_ceil(3)),
        None => None,
    }
}

fn base64_bound(
    bytes: u64,
    label: &str,
    field: &FieldDescriptor,
    model: &ModelDescriptor,
) -> Result<u64> {
    base64_length(bytes).ok_or_else(|| {
        Error::field_mapping(
            &model.name,
            &field.name,
            format!("bytes {label} ({bytes}) is too large for a base64 length bound"),
        )
    })
}

pub(crate) fn map_bytes(
    field: &FieldDescriptor,
    model: &ModelDescriptor,
    config: &GeneratorConfig,
) -> Result<TypeExpression> {
    let bytes = &config.bytes;
    let subject = format!("{}.{}", model.name, field.name);

    let mut out = if config.json_schema.enabled {
        let (pattern, label) = match config.json_schema.bytes_format {
            BytesFormat::Base64 => (BASE64_PATTERN, "base64"),
            BytesFormat::Hex => (HEX_PATTERN, "hex"),
        };
        let mut expr = Expr::call("z.string");
        expr.push(regex_modifier(
            pattern,
            &format!("{subject} must be a {label} string"),
            config,
        )?);
        let mut out = TypeExpression::new(expr);
        out.notes.push(format!("JSON Schema format: {label}"));
        if bytes.min_size.is_some() || bytes.max_size.is_some() {
            out.notes
                .push("Byte size bounds not enforced in JSON Schema mode".to_string());
        }
        out
    } else {
        match bytes.representation {
            BytesRepresentation::Base64 => {
                let mut expr = Expr::call("z.string");
                expr.push(regex_modifier(
                    BASE64_PATTERN,
                    &format!("{subject} must be base64 encoded"),
                    config,
                )?);
                if let Some(min) = bytes.min_size {
                    expr = expr.with(
                        "min",
                        base64_bound(min, "minSize", field, model)?.to_string(),
                    );
                }
                if let Some(max) = bytes.max_size {
                    expr = expr.with(
                        "max",
                        base64_bound(max, "maxSize", field, model)?.to_string(),
                    );
                }
                let mut out = TypeExpression::new(expr);
                if let Some(min) = bytes.min_size {
                    out.notes.push(format!("Minimum size {min} bytes"));
                }
                if let Some(max) = bytes.max_size {
                    out.notes.push(format!("Maximum size {max} bytes"));
                }
                out
            }
            BytesRepresentation::Binary => {
                let mut expr = Expr::call_with("z.instanceof", "Uint8Array");
                if let Some(min) = bytes.min_size {
                    let msg = format!("{subject} must be at least {min} bytes");
                    expr = expr.with(
                        "refine",
                        format!("(b) => b.length >= {min}, {}", message_params(config, &msg)),
                    );
                }
                if let Some(max) = bytes.max_size {
                    let msg = format!("{subject} must be at most {max} bytes");
                    expr = expr.with(
                        "refine",
                        format!("(b) => b.length <= {max}, {}", message_params(config, &msg)),
                    );
                }
                let mut out = TypeExpression::new(expr);
                out.special = true;
                out
            }
        }
    };

    if !bytes.allowed_mime_types.is_empty() {
        out.notes.push(format!(
            "Allowed MIME types: {} (not enforced)",
            bytes.allowed_mime_types.join(", ")
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use schemaforge_core::{BytesConfig, JsonSchemaCompat};

    fn map(config: &GeneratorConfig) -> TypeExpression {
        let field = FieldDescriptor::scalar("avatar", "Bytes");
        let model = ModelDescriptor::new("User").field(field.clone());
        map_bytes(&field, &model, config).unwrap()
    }

    #[test]
    fn test_base64_length() {
        assert_eq!(base64_length(0), Some(0));
        assert_eq!(base64_length(1), Some(2));
        assert_eq!(base64_length(3), Some(4));
        assert_eq!(base64_length(4), Some(6));
        assert_eq!(
            base64_length(u64::MAX / 4),
            Some((u64::MAX / 4 * 4).div_ceil(3))
        );
        assert_eq!(base64_length(u64::MAX), None);
    }

    #[test]
    fn test_oversized_bound_is_an_error() {
        let config = GeneratorConfig::default().bytes(BytesConfig {
            max_size: Some(u64::MAX),
            ..BytesConfig::default()
        });
        let field = FieldDescriptor::scalar("avatar", "Bytes");
        let model = ModelDescriptor::new("User").field(field.clone());
        let err = map_bytes(&field, &model, &config).unwrap_err();
        assert!(err.to_string().contains("maxSize"));
    }

    #[test]
    fn test_default_base64_bounds() {
        let config = GeneratorConfig::default().bytes(BytesConfig {
            min_size: Some(1),
            max_size: Some(3),
            allowed_mime_types: vec!["image/png".to_string()],
            ..BytesConfig::default()
        });
        let out = map(&config);
        let text = out.expr.to_string();
        assert!(text.starts_with(r"z.string().regex(/^[A-Za-z0-9+\/]*={0,2}$/"));
        assert!(text.ends_with(".min(2).max(4)"));
        assert!(out.notes.iter().any(|n| n.contains("image/png")));
    }

    #[test]
    fn test_binary_representation() {
        let config = GeneratorConfig::default().bytes(BytesConfig {
            representation: BytesRepresentation::Binary,
            max_size: Some(1024),
            ..BytesConfig::default()
        });
        let out = map(&config);
        let text = out.expr.to_string();
        assert!(text.starts_with("z.instanceof(Uint8Array).refine((b) => b.length <= 1024"));
        assert!(out.special);
    }

    #[test]
    fn test_json_schema_hex() {
        let config = GeneratorConfig::default().json_schema(JsonSchemaCompat {
            enabled: true,
            bytes_format: BytesFormat::Hex,
            ..JsonSchemaCompat::default()
        });
        let out = map(&config);
        assert!(out.expr.to_string().starts_with("z.string().regex(/^[0-9a-fA-F]*$/"));
        assert!(!out.special);
    }

    #[test]
    fn test_base64_pattern_matches() {
        let re = Regex::new(BASE64_PATTERN).unwrap();
        assert!(re.is_match("SGVsbG8="));
        assert!(!re.is_match("not base64!"));
    }
}
