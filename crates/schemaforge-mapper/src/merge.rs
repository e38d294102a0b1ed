//! Merging directive chains into generated expressions.
//!
//! Merging works on the expression AST: optionality modifiers are stripped,
//! deduplicated and moved structurally, never by text surgery.

use schemaforge_core::{
    Base, Directive, DirectiveTarget, Error, Expr, FieldDescriptor, Modifier, Result, ScalarKind,
};

/// Modifiers that turn a permissive JSON expression into a structural one.
const JSON_STRUCTURES: [&str; 3] = ["record", "object", "array"];

/// Result of merging all chain directives of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub expression: Expr,
    /// Number of directives applied.
    pub applied: usize,
    pub notes: Vec<String>,
}

/// Merge every [`Directive::Chain`] in `directives` into `expression`.
///
/// Replacement and structure directives are handled by the type mapper before
/// merging and are skipped here. Any failure leaves the caller's expression
/// untouched.
pub fn merge_directives(
    expression: Expr,
    directives: &[Directive],
    field: &FieldDescriptor,
) -> Result<MergeOutcome> {
    let mut outcome = MergeOutcome {
        expression,
        applied: 0,
        notes: Vec::new(),
    };

    for directive in directives {
        let Directive::Chain { target, modifiers } = directive else {
            continue;
        };
        match target {
            DirectiveTarget::Field => merge_field_chain(&mut outcome, modifiers, field),
            DirectiveTarget::Element => merge_element_chain(&mut outcome, modifiers, field)?,
        }
        outcome.applied += 1;
    }

    if !field.is_relation() {
        normalize_nullability(&mut outcome.expression);
    }
    Ok(outcome)
}

fn merge_field_chain(outcome: &mut MergeOutcome, modifiers: &[Modifier], field: &FieldDescriptor) {
    let mut modifiers = modifiers.to_vec();

    if field.is_scalar(ScalarKind::Json)
        && !field.is_list
        && modifiers
            .first()
            .is_some_and(|m| JSON_STRUCTURES.contains(&m.name.as_str()))
    {
        let structure = modifiers.remove(0);
        let previous = outcome.expression.to_string();
        outcome.expression.base = Base::Call {
            path: format!("z.{}", structure.name),
            args: structure.args,
        };
        outcome
            .notes
            .push(format!("JSON structure directive replaced `{previous}`"));
    }

    if !field.is_relation() {
        strip_optional(&mut modifiers, outcome);
    }
    outcome.expression.extend(modifiers);
}

fn merge_element_chain(
    outcome: &mut MergeOutcome,
    modifiers: &[Modifier],
    field: &FieldDescriptor,
) -> Result<()> {
    if !field.is_list {
        return Err(Error::annotation(&field.name, "element directive on a non-list field"));
    }
    let mut modifiers = modifiers.to_vec();
    if !field.is_relation() {
        strip_optional(&mut modifiers, outcome);
    }

    let (outer, inner): (Vec<Modifier>, Vec<Modifier>) =
        modifiers.into_iter().partition(Modifier::is_nullability);

    let element = outcome.expression.element_mut().ok_or_else(|| {
        Error::annotation(&field.name, "element directive without an array expression")
    })?;
    element.extend(inner);
    outcome.expression.extend(outer);
    Ok(())
}

fn strip_optional(modifiers: &mut Vec<Modifier>, outcome: &mut MergeOutcome) {
    let before = modifiers.len();
    modifiers.retain(|m| m.name != "optional");
    if modifiers.len() != before {
        outcome
            .notes
            .push("Ignored .optional() from directive; optionality follows the schema".to_string());
    }
}

/// Collapse top-level `.nullable()` / `.nullish()` into one trailing modifier.
/// `.nullish()` wins over `.nullable()`.
pub fn normalize_nullability(expr: &mut Expr) {
    let taken = expr.take_modifiers(Modifier::is_nullability);
    if taken.is_empty() {
        return;
    }
    let nullish = taken.iter().any(|m| m.name == "nullish");
    expr.push(Modifier::bare(if nullish { "nullish" } else { "nullable" }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaforge_core::{RelationInfo, parse_chain};

    fn chain(text: &str) -> Directive {
        Directive::Chain {
            target: DirectiveTarget::Field,
            modifiers: parse_chain(text).unwrap(),
        }
    }

    fn element(text: &str) -> Directive {
        Directive::Chain {
            target: DirectiveTarget::Element,
            modifiers: parse_chain(text).unwrap(),
        }
    }

    #[test]
    fn test_chain_appended() {
        let field = FieldDescriptor::scalar("email", "String");
        let directives = [chain(".email().max(255)")];
        let out = merge_directives(Expr::call("z.string"), &directives, &field);
        let out = out.unwrap();
        assert_eq!(out.expression.to_string(), "z.string().email().max(255)");
        assert_eq!(out.applied, 1);
    }

    #[test]
    fn test_scalar_optional_stripped_and_nullable_moved_last() {
        let field = FieldDescriptor::scalar("nickname", "String");
        let out = merge_directives(
            Expr::call("z.string"),
            &[chain(".nullable().optional().min(2)")],
            &field,
        )
        .unwrap();
        assert_eq!(out.expression.to_string(), "z.string().min(2).nullable()");
        assert_eq!(out.notes.len(), 1);
    }

    #[test]
    fn test_nullability_deduplicated() {
        let field = FieldDescriptor::scalar("meta", "Json");
        let base = Expr::call_with("z.record", "z.string(), z.unknown()").with("nullable", "");
        let out = merge_directives(base, &[chain(".nullish()")], &field).unwrap();
        assert_eq!(
            out.expression.to_string(),
            "z.record(z.string(), z.unknown()).nullish()"
        );
    }

    #[test]
    fn test_relation_keeps_directive_optionality() {
        let field = FieldDescriptor::relation(
            "author",
            RelationInfo::new("User").from_fields(["authorId"]),
        );
        let out = merge_directives(
            Expr::deferred("UserSchema"),
            &[chain(".optional().nullable()")],
            &field,
        )
        .unwrap();
        assert_eq!(
            out.expression.to_string(),
            "z.lazy(() => UserSchema).optional().nullable()"
        );
    }

    #[test]
    fn test_element_directive_rewrites_array() {
        let field = FieldDescriptor::scalar("tags", "String").list();
        let base = Expr::array(Expr::call("z.string"));
        let directives = [element(".min(2).nullable()"), chain(".max(5)")];
        let out = merge_directives(base, &directives, &field).unwrap();
        assert_eq!(
            out.expression.to_string(),
            "z.array(z.string().min(2)).max(5).nullable()"
        );
    }

    #[test]
    fn test_element_directive_on_scalar_fails() {
        let field = FieldDescriptor::scalar("title", "String");
        let err = merge_directives(Expr::call("z.string"), &[element(".min(2)")], &field);
        assert!(err.is_err());
    }

    #[test]
    fn test_json_structure_replaces_permissive_base() {
        let field = FieldDescriptor::scalar("settings", "Json");
        let out = merge_directives(
            Expr::call("z.unknown"),
            &[chain(".record(z.string(), z.boolean()).refine((v) => Object.keys(v).length > 0)")],
            &field,
        )
        .unwrap();
        assert_eq!(
            out.expression.to_string(),
            "z.record(z.string(), z.boolean()).refine((v) => Object.keys(v).length > 0)"
        );
        assert_eq!(out.notes.len(), 1);
    }
}
