//! Conversions between JSON literals and expressions.

use schemaforge_core::{Error, Expr, FieldDescriptor, FieldKind, Result, ScalarKind};
use serde_json::Value;

/// Infer a structural expression from a JSON literal.
///
/// Objects map each key to the expression inferred from its value; arrays
/// take their element type from the first element, defaulting to
/// `z.unknown()` when empty.
pub fn infer_from_literal(value: &Value) -> Expr {
    match value {
        Value::Null => Expr::call("z.null"),
        Value::Bool(_) => Expr::call("z.boolean"),
        Value::Number(n) if n.is_i64() || n.is_u64() => Expr::call("z.number").with("int", ""),
        Value::Number(_) => Expr::call("z.number"),
        Value::String(_) => Expr::call("z.string"),
        Value::Array(items) => Expr::array(
            items
                .first()
                .map_or_else(|| Expr::call("z.unknown"), infer_from_literal),
        ),
        Value::Object(map) => Expr::object(
            map.iter()
                .map(|(key, value)| (key.clone(), infer_from_literal(value)))
                .collect(),
        ),
    }
}

/// Build the replacement expression for a structure directive payload.
///
/// Object and array literals are inferred structurally; anything else must
/// itself be an expression and is used as written.
pub fn structure_from_payload(payload: &str) -> Result<Expr> {
    let trimmed = payload.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        let value: Value = serde_json::from_str(trimmed).map_err(Error::from)?;
        return Ok(infer_from_literal(&value));
    }
    Expr::parse(trimmed)
}

/// Render a literal default value as `.default(...)` argument text for the
/// given field.
pub fn default_argument(value: &Value, field: &FieldDescriptor) -> String {
    match (&field.kind, value) {
        (FieldKind::Scalar(ScalarKind::BigInt), Value::Number(n)) => format!("BigInt({n})"),
        (FieldKind::Scalar(ScalarKind::BigInt), Value::String(s)) => {
            format!("BigInt({})", Value::String(s.clone()))
        }
        (FieldKind::Scalar(ScalarKind::DateTime), Value::String(s)) => {
            format!("new Date({})", Value::String(s.clone()))
        }
        _ => value.to_string(),
    }
}
