//! `Decimal` strategies.

use schemaforge_core::{
    DecimalConfig, DecimalMode, Expr, FieldDescriptor, GeneratorConfig, Import, ModelDescriptor,
    Result,
};

use super::{TypeExpression, message_params, regex_modifier};

/// Regex accepting decimal strings within the configured precision and scale.
///
/// With both bounds the integer part may have at most `precision - scale`
/// digits (at least one) and the fraction at most `scale` digits.
pub fn decimal_pattern(decimal: &DecimalConfig) -> String {
    let sign = if decimal.allow_negative { "-?" } else { "" };
    match (decimal.max_precision, decimal.max_scale) {
        (Some(precision), Some(0)) => format!(r"^{sign}\d{{1,{precision}}}$"),
        (Some(precision), Some(scale)) => {
            let int_digits = precision.saturating_sub(scale).max(1);
            format!(r"^{sign}\d{{1,{int_digits}}}(\.\d{{1,{scale}}})?$")
        }
        (Some(precision), None) => format!(r"^{sign}\d{{1,{precision}}}(\.\d+)?$"),
        (None, Some(0)) => format!(r"^{sign}\d+$"),
        (None, Some(scale)) => format!(r"^{sign}\d+(\.\d{{1,{scale}}})?$"),
        (None, None) => format!(r"^{sign}\d+(\.\d+)?$"),
    }
}

fn bounds_description(decimal: &DecimalConfig) -> Option<String> {
    match (decimal.max_precision, decimal.max_scale) {
        (Some(p), Some(s)) => Some(format!("precision {p}, scale {s}")),
        (Some(p), None) => Some(format!("precision {p}")),
        (None, Some(s)) => Some(format!("scale {s}")),
        (None, None) => None,
    }
}

pub(crate) fn map_decimal(
    field: &FieldDescriptor,
    model: &ModelDescriptor,
    config: &GeneratorConfig,
) -> Result<TypeExpression> {
    let decimal = &config.decimal;
    let mode = if config.json_schema.enabled && decimal.mode == DecimalMode::Decimal {
        DecimalMode::String
    } else {
        decimal.mode
    };

    let mut out = match mode {
        DecimalMode::String => {
            let message = format!(
                "{}.{} must be a decimal string{}",
                model.name,
                field.name,
                bounds_description(decimal)
                    .map(|b| format!(" ({b})"))
                    .unwrap_or_default()
            );
            let mut expr = Expr::call("z.string");
            expr.push(regex_modifier(&decimal_pattern(decimal), &message, config)?);
            let mut out = TypeExpression::new(expr);
            if !decimal.allow_negative {
                out.notes.push("Negative values rejected".to_string());
            }
            out
        }
        DecimalMode::Number => {
            let mut expr = Expr::call("z.number");
            if !decimal.allow_negative {
                expr = expr.with("nonnegative", "");
            }
            let mut out = TypeExpression::new(expr);
            out.warnings.push(format!(
                "Decimal field `{}` mapped to number; values beyond double precision lose accuracy",
                field.name
            ));
            if let Some(bounds) = bounds_description(decimal) {
                out.notes
                    .push(format!("Declared {bounds} not enforced in number mode"));
            }
            out
        }
        DecimalMode::Decimal => {
            let message = format!("{}.{} must be a Decimal instance", model.name, field.name);
            let mut expr = Expr::call_with(
                "z.instanceof",
                format!("Prisma.Decimal, {}", message_params(config, &message)),
            );
            if !decimal.allow_negative {
                let negative = format!("{}.{} must not be negative", model.name, field.name);
                expr = expr.with(
                    "refine",
                    format!(
                        "(v) => !v.isNegative(), {}",
                        message_params(config, &negative)
                    ),
                );
            }
            let mut out = TypeExpression::new(expr).import(Import::Prisma);
            out.special = true;
            if let Some(bounds) = bounds_description(decimal) {
                out.notes
                    .push(format!("Declared {bounds} checked by the database"));
            }
            out
        }
    };

    if mode != decimal.mode {
        out.notes
            .push("JSON Schema compatibility: Decimal rendered as string".to_string());
    }
    Ok(out)
}
