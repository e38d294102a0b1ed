//! Inline annotation directives.
//!
//! Field and model documentation may embed `@zod` directives that replace or
//! extend the generated expression. An [`AnnotationExtractor`] turns the raw
//! documentation into structured [`Directive`]s; the mapper decides how they
//! merge. Extraction never aborts a run: unparseable directives come back as
//! diagnostics.
//!
//! Supported forms, one per line:
//!
//! | directive | meaning |
//! |---|---|
//! | `@zod.custom.use(<expr>)<chain>` | replace the generated expression |
//! | `@zod.custom(<literal>)<chain>` | replace with a structure inferred from a JSON literal |
//! | `@zod.element<chain>` | chain applied to list elements |
//! | `@zod[.<hint>]<chain>` | chain appended to the field expression |

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::expr::{Expr, Modifier, matching_close, parse_chain};

const MARKER: &str = "@zod";

/// Minimal description of the field a directive is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldContext {
    pub model: String,
    pub field: String,
    pub type_name: String,
    pub is_optional: bool,
    pub is_list: bool,
}

/// What a modifier chain applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectiveTarget {
    /// The whole field (the array for list fields).
    Field,
    /// Each element of a list field.
    Element,
}

/// One structured directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// Full replacement of the generated expression.
    Replace(Expr),
    /// Replacement by a structure inferred from a literal payload, followed
    /// by a modifier chain. Non-literal payloads are used verbatim.
    Structure {
        payload: String,
        chain: Vec<Modifier>,
    },
    /// Modifier chain merged into the generated expression.
    Chain {
        target: DirectiveTarget,
        modifiers: Vec<Modifier>,
    },
}

/// Result of extracting directives from one documentation string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub directives: Vec<Directive>,
    /// Documentation text with directives removed.
    pub description: Option<String>,
    /// Parse errors for individual directives.
    pub diagnostics: Vec<String>,
}

impl Extraction {
    /// Whether any directive was found.
    #[must_use]
    pub fn has_directives(&self) -> bool {
        !self.directives.is_empty()
    }
}

/// Extracts structured directives from documentation text.
pub trait AnnotationExtractor {
    /// Extract field-level directives.
    fn extract_field(&self, documentation: &str, context: &FieldContext) -> Result<Extraction>;

    /// Extract model-level directives (chains applied after the object
    /// constructor).
    fn extract_model(&self, documentation: &str, model: &str) -> Result<Extraction>;
}

/// The default extractor for `@zod` comment directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentAnnotationExtractor;

impl CommentAnnotationExtractor {
    pub fn new() -> Self {
        Self
    }

    fn scan(documentation: &str, mut parse: impl FnMut(&str) -> Result<Directive>) -> Extraction {
        let mut extraction = Extraction::default();
        let mut description: Vec<&str> = Vec::new();

        for line in documentation.lines() {
            let Some(at) = find_marker(line) else {
                let text = line.trim();
                if !text.is_empty() {
                    description.push(text);
                }
                continue;
            };

            let before = line[..at].trim();
            if !before.is_empty() {
                description.push(before);
            }
            match parse(line[at..].trim()) {
                Ok(directive) => extraction.directives.push(directive),
                Err(e) => extraction.diagnostics.push(e.to_string()),
            }
        }

        if !description.is_empty() {
            extraction.description = Some(description.join(" "));
        }
        extraction
    }
}

impl AnnotationExtractor for CommentAnnotationExtractor {
    fn extract_field(&self, documentation: &str, context: &FieldContext) -> Result<Extraction> {
        let target = format!("{}.{}", context.model, context.field);
        Ok(Self::scan(documentation, |text| parse_field_directive(text, &target)))
    }

    fn extract_model(&self, documentation: &str, model: &str) -> Result<Extraction> {
        Ok(Self::scan(documentation, |text| {
            match parse_field_directive(text, model)? {
                chain @ Directive::Chain {
                    target: DirectiveTarget::Field,
                    ..
                } => Ok(chain),
                _ => Err(Error::annotation(model, "only modifier chains are allowed on models")),
            }
        }))
    }
}

/// Position of the first `@zod` marker that starts a directive.
fn find_marker(line: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(pos) = line[offset..].find(MARKER) {
        let at = offset + pos;
        let next = line[at + MARKER.len()..].chars().next();
        if next.is_none_or(|c| c == '.' || c.is_whitespace()) {
            return Some(at);
        }
        offset = at + MARKER.len();
    }
    None
}

/// Split `name(args)rest` at the first balanced call.
fn split_call<'a>(text: &'a str, target: &str) -> Result<(&'a str, &'a str)> {
    let chars: Vec<char> = text.chars().collect();
    if chars.first() != Some(&'(') {
        return Err(Error::annotation(target, format!("expected `(` in `{text}`")));
    }
    let close = matching_close(&chars, 0)
        .ok_or_else(|| Error::annotation(target, format!("unbalanced directive `{text}`")))?;
    let args_end: usize = chars[..close].iter().map(|c| c.len_utf8()).sum();
    Ok((text[1..args_end].trim(), &text[args_end + 1..]))
}

fn parse_field_directive(text: &str, target: &str) -> Result<Directive> {
    let rest = text
        .strip_prefix(MARKER)
        .ok_or_else(|| Error::annotation(target, "missing @zod marker"))?;

    if let Some(after) = rest.strip_prefix(".custom.use") {
        let (payload, chain) = split_call(after, target)?;
        let mut expr = Expr::parse(payload)?;
        expr.extend(parse_chain(chain)?);
        return Ok(Directive::Replace(expr));
    }

    if let Some(after) = rest.strip_prefix(".custom") {
        if after.starts_with('(') {
            let (payload, chain) = split_call(after, target)?;
            if payload.is_empty() {
                return Err(Error::annotation(target, "empty custom payload"));
            }
            return Ok(Directive::Structure {
                payload: payload.to_string(),
                chain: parse_chain(chain)?,
            });
        }
    }

    if let Some(after) = rest.strip_prefix(".element") {
        if after.starts_with('.') {
            return Ok(Directive::Chain {
                target: DirectiveTarget::Element,
                modifiers: non_empty_chain(after, target)?,
            });
        }
    }

    Ok(Directive::Chain {
        target: DirectiveTarget::Field,
        modifiers: non_empty_chain(strip_type_hint(rest), target)?,
    })
}

/// Drop a leading `.hint` segment that is not itself a call
/// (`.string.min(1)` becomes `.min(1)`).
fn strip_type_hint(chain: &str) -> &str {
    let Some(body) = chain.strip_prefix('.') else {
        return chain;
    };
    let ident_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(body.len());
    if ident_len > 0 && body[ident_len..].starts_with('.') {
        &body[ident_len..]
    } else {
        chain
    }
}

fn non_empty_chain(text: &str, target: &str) -> Result<Vec<Modifier>> {
    let modifiers = parse_chain(text)?;
    if modifiers.is_empty() {
        return Err(Error::annotation(target, "directive has no modifiers"));
    }
    Ok(modifiers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> FieldContext {
        FieldContext {
            model: "User".to_string(),
            field: "email".to_string(),
            type_name: "String".to_string(),
            is_optional: false,
            is_list: false,
        }
    }

    fn extract(doc: &str) -> Extraction {
        CommentAnnotationExtractor::new()
            .extract_field(doc, &context())
            .unwrap()
    }

    #[test]
    fn test_plain_documentation() {
        let extraction = extract("The user's login address.\nMust be unique.");
        assert!(!extraction.has_directives());
        assert_eq!(
            extraction.description.as_deref(),
            Some("The user's login address. Must be unique.")
        );
    }

    #[test]
    fn test_chain_directive_with_description() {
        let extraction = extract("Login address @zod.email().max(255)");
        assert_eq!(extraction.description.as_deref(), Some("Login address"));
        assert_eq!(
            extraction.directives,
            vec![Directive::Chain {
                target: DirectiveTarget::Field,
                modifiers: vec![Modifier::bare("email"), Modifier::new("max", "255")],
            }]
        );
    }

    #[test]
    fn test_type_hint_is_skipped() {
        let extraction = extract("@zod.string.min(3)");
        assert_eq!(
            extraction.directives,
            vec![Directive::Chain {
                target: DirectiveTarget::Field,
                modifiers: vec![Modifier::new("min", "3")],
            }]
        );
    }

    #[test]
    fn test_custom_use_replacement() {
        let extraction = extract("@zod.custom.use(z.string().url()).optional()");
        let Directive::Replace(expr) = &extraction.directives[0] else {
            panic!("expected replacement");
        };
        assert_eq!(expr.to_string(), "z.string().url().optional()");
    }

    #[test]
    fn test_custom_structure() {
        let extraction = extract(r#"@zod.custom({"street": "x", "zip": 1}).strict()"#);
        assert_eq!(
            extraction.directives,
            vec![Directive::Structure {
                payload: r#"{"street": "x", "zip": 1}"#.to_string(),
                chain: vec![Modifier::bare("strict")],
            }]
        );
    }

    #[test]
    fn test_element_directive() {
        let extraction = extract("@zod.element.min(2).max(20)");
        assert_eq!(
            extraction.directives,
            vec![Directive::Chain {
                target: DirectiveTarget::Element,
                modifiers: vec![Modifier::new("min", "2"), Modifier::new("max", "20")],
            }]
        );
    }

    #[test]
    fn test_malformed_directive_becomes_diagnostic() {
        let extraction = extract("Broken @zod.min(1\nok line");
        assert!(extraction.directives.is_empty());
        assert_eq!(extraction.diagnostics.len(), 1);
        assert_eq!(extraction.description.as_deref(), Some("Broken ok line"));
    }

    #[test]
    fn test_marker_needs_word_boundary() {
        let extraction = extract("see @zodiac for details");
        assert!(!extraction.has_directives());
        assert!(extraction.diagnostics.is_empty());
    }

    #[test]
    fn test_model_directives() {
        let extractor = CommentAnnotationExtractor::new();
        let extraction = extractor
            .extract_model(
                "A user account\n@zod.refine((u) => u.a !== u.b, { message: \"differ\" })",
                "User",
            )
            .unwrap();
        assert_eq!(extraction.description.as_deref(), Some("A user account"));
        assert_eq!(extraction.directives.len(), 1);

        let extraction = extractor
            .extract_model("@zod.custom.use(z.any())", "User")
            .unwrap();
        assert!(extraction.directives.is_empty());
        assert_eq!(extraction.diagnostics.len(), 1);
    }
}
