//! `DateTime` strategies.

use schemaforge_core::{
    DateTimeStrategy, Expr, FieldDescriptor, GeneratorConfig, JsonSchemaDateFormat,
    ModelDescriptor, Result, TimezonePolicy,
};
use serde_json::Value;

use super::{TypeExpression, message_params, regex_modifier};

/// `YYYY-MM-DD`.
pub const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// ISO-8601 timestamp with an explicit offset or `Z`.
pub const ISO_DATETIME_PATTERN: &str =
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})$";

/// ISO-8601 timestamp in UTC only.
pub const ISO_DATETIME_UTC_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?Z$";

fn quoted(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

/// ISO-string validator for the configured target version.
fn iso_string(config: &GeneratorConfig) -> Result<Expr> {
    let args = match config.date_time.timezone {
        TimezonePolicy::Any => "{ offset: true }",
        TimezonePolicy::RequireUtc => "",
    };
    Expr::parse(&format!("{}({args})", config.target.iso_datetime_call()))
}

/// Bound and direction constraints as `(name, args)` pairs, targeting either
/// a date value (`on_date`) or an ISO string that is parsed first.
fn bound_modifiers(
    field: &FieldDescriptor,
    model: &ModelDescriptor,
    config: &GeneratorConfig,
    on_date: bool,
) -> Vec<(String, String)> {
    let dt = &config.date_time;
    let subject = format!("{}.{}", model.name, field.name);
    let mut modifiers = Vec::new();

    if on_date {
        if let Some(min) = &dt.min {
            let msg = format!("{subject} must be on or after {min}");
            modifiers.push((
                "min".to_string(),
                format!(
                    "new Date({}), {}",
                    quoted(min),
                    message_params(config, &msg)
                ),
            ));
        }
        if let Some(max) = &dt.max {
            let msg = format!("{subject} must be on or before {max}");
            modifiers.push((
                "max".to_string(),
                format!(
                    "new Date({}), {}",
                    quoted(max),
                    message_params(config, &msg)
                ),
            ));
        }
    } else {
        if let Some(min) = &dt.min {
            let msg = format!("{subject} must be on or after {min}");
            modifiers.push((
                "refine".to_string(),
                format!(
                    "(d) => new Date(d) >= new Date({}), {}",
                    quoted(min),
                    message_params(config, &msg)
                ),
            ));
        }
        if let Some(max) = &dt.max {
            let msg = format!("{subject} must be on or before {max}");
            modifiers.push((
                "refine".to_string(),
                format!(
                    "(d) => new Date(d) <= new Date({}), {}",
                    quoted(max),
                    message_params(config, &msg)
                ),
            ));
        }
    }

    let value = if on_date { "d" } else { "new Date(d)" };
    if !dt.allow_future {
        let msg = format!("{subject} must not be in the future");
        modifiers.push((
            "refine".to_string(),
            format!(
                "(d) => {value} <= new Date(), {}",
                message_params(config, &msg)
            ),
        ));
    }
    if !dt.allow_past {
        let msg = format!("{subject} must not be in the past");
        modifiers.push((
            "refine".to_string(),
            format!(
                "(d) => {value} >= new Date(), {}",
                message_params(config, &msg)
            ),
        ));
    }
    modifiers
}

fn bound_notes(config: &GeneratorConfig) -> Vec<String> {
    let dt = &config.date_time;
    let mut notes = Vec::new();
    if let Some(min) = &dt.min {
        notes.push(format!("Minimum date {min} (not enforced)"));
    }
    if let Some(max) = &dt.max {
        notes.push(format!("Maximum date {max} (not enforced)"));
    }
    if !dt.allow_future {
        notes.push("Future dates disallowed (not enforced)".to_string());
    }
    if !dt.allow_past {
        notes.push("Past dates disallowed (not enforced)".to_string());
    }
    notes
}

pub(crate) fn map_datetime(
    field: &FieldDescriptor,
    model: &ModelDescriptor,
    config: &GeneratorConfig,
) -> Result<TypeExpression> {
    let dt = &config.date_time;

    if config.json_schema.enabled {
        let (pattern, label) = match config.json_schema.date_time_format {
            JsonSchemaDateFormat::Date => (DATE_PATTERN, "date"),
            JsonSchemaDateFormat::DateTime => match dt.timezone {
                TimezonePolicy::Any => (ISO_DATETIME_PATTERN, "date-time"),
                TimezonePolicy::RequireUtc => (ISO_DATETIME_UTC_PATTERN, "UTC date-time"),
            },
        };
        let msg = format!(
            "{}.{} must be an ISO {label} string",
            model.name, field.name
        );
        let mut expr = Expr::call("z.string");
        expr.push(regex_modifier(pattern, &msg, config)?);
        let mut out = TypeExpression::new(expr);
        out.notes.push(format!("JSON Schema format: {label}"));
        out.notes.extend(bound_notes(config));
        return Ok(out);
    }

    let out = match dt.strategy {
        DateTimeStrategy::IsoString => {
            let mut expr = iso_string(config)?;
            if dt.strict {
                for (name, args) in bound_modifiers(field, model, config, false) {
                    expr = expr.with(name, args);
                }
            }
            expr = expr.with("transform", "(d) => new Date(d)");
            let mut out = TypeExpression::new(expr);
            out.special = true;
            out.notes.push("ISO string transformed to Date".to_string());
            if !dt.strict {
                out.notes.extend(bound_notes(config));
            }
            out
        }
        DateTimeStrategy::Coerce => {
            let mut expr = Expr::call("z.coerce.date");
            if dt.strict {
                for (name, args) in bound_modifiers(field, model, config, true) {
                    expr = expr.with(name, args);
                }
            }
            let mut out = TypeExpression::new(expr);
            out.special = true;
            out.notes.push("Input coerced to Date".to_string());
            if !dt.strict {
                out.notes.extend(bound_notes(config));
            }
            out
        }
        DateTimeStrategy::Date if dt.strict => {
            let mut expr = Expr::call("z.date");
            for (name, args) in bound_modifiers(field, model, config, true) {
                expr = expr.with(name, args);
            }
            TypeExpression::new(expr)
        }
        DateTimeStrategy::Date => {
            let expr = Expr::union(vec![Expr::call("z.date"), iso_string(config)?]);
            let mut out = TypeExpression::new(expr);
            out.notes.push("Accepts Date or ISO string".to_string());
            out.notes.extend(bound_notes(config));
            out
        }
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use schemaforge_core::{DateTimeConfig, JsonSchemaCompat, TargetVersion};

    fn map(config: &GeneratorConfig) -> TypeExpression {
        let field = FieldDescriptor::scalar("publishedAt", "DateTime");
        let model = ModelDescriptor::new("Post").field(field.clone());
        map_datetime(&field, &model, config).unwrap()
    }

    #[test]
    fn test_default_strict_date() {
        let out = map(&GeneratorConfig::default());
        assert_eq!(out.expr.to_string(), "z.date()");
        assert!(!out.special);
    }

    #[test]
    fn test_strict_bounds_enforced() {
        let config = GeneratorConfig::default().date_time(DateTimeConfig {
            min: Some("2020-01-01".to_string()),
            allow_future: false,
            ..DateTimeConfig::default()
        });
        let text = map(&config).expr.to_string();
        assert!(text.starts_with("z.date().min(new Date(\"2020-01-01\"), { error: "));
        assert!(text.contains(".refine((d) => d <= new Date(), "));
    }

    #[test]
    fn test_non_strict_union_notes_bounds() {
        let config = GeneratorConfig::default().date_time(DateTimeConfig {
            strict: false,
            max: Some("2030-01-01".to_string()),
            ..DateTimeConfig::default()
        });
        let out = map(&config);
        assert_eq!(
            out.expr.to_string(),
            "z.union([z.date(), z.iso.datetime({ offset: true })])"
        );
        assert!(out.notes.iter().any(|n| n.contains("2030-01-01")));
    }

    #[test]
    fn test_iso_string_per_target() {
        let config = GeneratorConfig::default().date_time(DateTimeConfig {
            strategy: DateTimeStrategy::IsoString,
            timezone: TimezonePolicy::RequireUtc,
            ..DateTimeConfig::default()
        });
        assert_eq!(
            map(&config).expr.to_string(),
            "z.iso.datetime().transform((d) => new Date(d))"
        );

        let config = config.target(TargetVersion::V3);
        assert_eq!(
            map(&config).expr.to_string(),
            "z.string().datetime().transform((d) => new Date(d))"
        );
    }

    #[test]
    fn test_coerce() {
        let config = GeneratorConfig::default().date_time(DateTimeConfig {
            strategy: DateTimeStrategy::Coerce,
            ..DateTimeConfig::default()
        });
        let out = map(&config);
        assert_eq!(out.expr.to_string(), "z.coerce.date()");
        assert!(out.special);
    }

    #[test]
    fn test_json_schema_formats() {
        let config = GeneratorConfig::default().json_schema(JsonSchemaCompat {
            enabled: true,
            ..JsonSchemaCompat::default()
        });
        let out = map(&config);
        assert!(out.expr.to_string().starts_with("z.string().regex("));
        assert!(!out.expr.has_modifier("transform"));

        let re = Regex::new(ISO_DATETIME_PATTERN).unwrap();
        assert!(re.is_match("2024-05-01T10:20:30.123Z"));
        assert!(re.is_match("2024-05-01T10:20:30+02:00"));
        assert!(!re.is_match("2024-05-01"));

        let re = Regex::new(DATE_PATTERN).unwrap();
        assert!(re.is_match("2024-05-01"));
        assert!(!re.is_match("2024-05-01T10:20:30Z"));
    }
}
