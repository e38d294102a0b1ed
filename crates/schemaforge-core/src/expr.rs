//! Validation-expression builder AST.
//!
//! Expressions are kept structured until the very end of a run: a base
//! constructor plus an ordered list of chained modifiers. Annotation merging
//! strips, reorders and re-targets modifiers on this structure; text is only
//! produced when a module is rendered.
//!
//! # Example
//!
//! ```
//! use schemaforge_core::expr::Expr;
//!
//! let expr = Expr::call("z.string").with("min", "1").with("optional", "");
//! assert_eq!(expr.to_string(), "z.string().min(1).optional()");
//!
//! let parsed = Expr::parse("z.string().email().max(255)").unwrap();
//! assert_eq!(parsed.modifiers.len(), 2);
//! assert_eq!(parsed.to_string(), "z.string().email().max(255)");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Modifiers that control whether a value may be absent or null.
pub const OPTIONALITY_MODIFIERS: [&str; 3] = ["optional", "nullable", "nullish"];

/// One chained modifier call: `.name(args)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier {
    /// Method name (`"min"`, `"optional"`).
    pub name: String,
    /// Raw argument text between the parentheses.
    pub args: String,
}

impl Modifier {
    /// Create a modifier with arguments.
    pub fn new(name: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: args.into(),
        }
    }

    /// Create an argument-less modifier.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    /// `.optional()`, `.nullable()` or `.nullish()`.
    #[must_use]
    pub fn is_optionality(&self) -> bool {
        OPTIONALITY_MODIFIERS.contains(&self.name.as_str())
    }

    /// `.nullable()` or `.nullish()`.
    #[must_use]
    pub fn is_nullability(&self) -> bool {
        self.name == "nullable" || self.name == "nullish"
    }

    /// `.default(...)`.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.name == "default"
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}({})", self.name, self.args)
    }
}

/// The constructor an expression chain starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Base {
    /// A builder call: `z.string()`, `z.instanceof(Prisma.Decimal)`.
    Call { path: String, args: String },
    /// `z.array(<element>)`.
    Array(Box<Expr>),
    /// `z.object({ key: <expr>, ... })`, keys in insertion order.
    Object(Vec<(String, Expr)>),
    /// `z.union([<expr>, ...])`.
    Union(Vec<Expr>),
    /// A deferred reference to another schema symbol, resolved at render
    /// time: `z.lazy(() => Symbol)`.
    Deferred(String),
    /// A direct reference to another schema symbol.
    Ref(String),
}

/// A complete validation-builder chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expr {
    pub base: Base,
    pub modifiers: Vec<Modifier>,
}

impl Expr {
    /// Expression from a base with no modifiers.
    pub fn from_base(base: Base) -> Self {
        Self {
            base,
            modifiers: Vec::new(),
        }
    }

    /// Argument-less builder call (`Expr::call("z.string")` is `z.string()`).
    pub fn call(path: impl Into<String>) -> Self {
        Self::call_with(path, "")
    }

    /// Builder call with raw argument text.
    pub fn call_with(path: impl Into<String>, args: impl Into<String>) -> Self {
        Self::from_base(Base::Call {
            path: path.into(),
            args: args.into(),
        })
    }

    /// Array of `element`.
    pub fn array(element: Expr) -> Self {
        Self::from_base(Base::Array(Box::new(element)))
    }

    /// Object with the given entries.
    pub fn object(entries: Vec<(String, Expr)>) -> Self {
        Self::from_base(Base::Object(entries))
    }

    /// Union of the given alternatives.
    pub fn union(items: Vec<Expr>) -> Self {
        Self::from_base(Base::Union(items))
    }

    /// Deferred reference to `symbol`.
    pub fn deferred(symbol: impl Into<String>) -> Self {
        Self::from_base(Base::Deferred(symbol.into()))
    }

    /// Direct reference to `symbol`.
    pub fn reference(symbol: impl Into<String>) -> Self {
        Self::from_base(Base::Ref(symbol.into()))
    }

    /// Append a modifier (consuming builder).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, args: impl Into<String>) -> Self {
        self.modifiers.push(Modifier::new(name, args));
        self
    }

    /// Append a modifier in place.
    pub fn push(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    /// Append several modifiers in place.
    pub fn extend<I: IntoIterator<Item = Modifier>>(&mut self, modifiers: I) {
        self.modifiers.extend(modifiers);
    }

    /// Whether a modifier with this name is present at the top level.
    #[must_use]
    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m.name == name)
    }

    /// Whether any optionality modifier is present at the top level.
    #[must_use]
    pub fn has_optionality(&self) -> bool {
        self.modifiers.iter().any(Modifier::is_optionality)
    }

    /// Remove and return all top-level modifiers matching `pred`.
    pub fn take_modifiers<F>(&mut self, mut pred: F) -> Vec<Modifier>
    where
        F: FnMut(&Modifier) -> bool,
    {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.modifiers.len());
        for modifier in self.modifiers.drain(..) {
            if pred(&modifier) {
                taken.push(modifier);
            } else {
                kept.push(modifier);
            }
        }
        self.modifiers = kept;
        taken
    }

    /// Whether the base is an array constructor.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.base, Base::Array(_))
    }

    /// Mutable access to the array element, if this is an array.
    pub fn element_mut(&mut self) -> Option<&mut Expr> {
        match &mut self.base {
            Base::Array(inner) => Some(inner),
            _ => None,
        }
    }

    /// Whether this is a bare permissive expression (`z.unknown()` / `z.any()`).
    #[must_use]
    pub fn is_permissive(&self) -> bool {
        matches!(&self.base, Base::Call { path, .. } if path == "z.unknown" || path == "z.any")
    }

    /// Symbols referenced by deferred or direct references, in order of
    /// appearance and without duplicates.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut Vec<String>) {
        match &self.base {
            Base::Deferred(symbol) | Base::Ref(symbol) => {
                if !out.contains(symbol) {
                    out.push(symbol.clone());
                }
            }
            Base::Array(inner) => inner.collect_symbols(out),
            Base::Object(entries) => {
                for (_, expr) in entries {
                    expr.collect_symbols(out);
                }
            }
            Base::Union(items) => {
                for expr in items {
                    expr.collect_symbols(out);
                }
            }
            Base::Call { .. } => {}
        }
    }

    /// Parse a complete expression such as `z.string().email()`.
    ///
    /// The first balanced call becomes the base; the remainder must be a
    /// modifier chain. `z.array(...)` and `z.lazy(() => Symbol)` are
    /// recognized structurally; any other call is kept as an opaque base.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::expression(text, "empty expression"));
        }
        let chars: Vec<char> = trimmed.chars().collect();

        let Some(open) = chars.iter().position(|&c| c == '(') else {
            if is_symbol_path(trimmed) {
                return Ok(Self::reference(trimmed));
            }
            return Err(Error::expression(text, "expected a builder call or symbol"));
        };

        let path: String = chars[..open].iter().collect::<String>().trim().to_string();
        if !is_symbol_path(&path) {
            return Err(Error::expression(text, format!("invalid callee `{path}`")));
        }
        let close = matching_close(&chars, open)
            .ok_or_else(|| Error::expression(text, "unbalanced parentheses"))?;
        let args: String = chars[open + 1..close]
            .iter()
            .collect::<String>()
            .trim()
            .to_string();
        let rest: String = chars[close + 1..].iter().collect();

        let base = match path.as_str() {
            "z.array" => match Expr::parse(&args) {
                Ok(inner) => Base::Array(Box::new(inner)),
                Err(_) => Base::Call { path, args },
            },
            "z.lazy" => match lazy_target(&args) {
                Some(symbol) => Base::Deferred(symbol),
                None => Base::Call { path, args },
            },
            _ => Base::Call { path, args },
        };

        Ok(Self {
            base,
            modifiers: parse_chain(&rest)?,
        })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.base {
            Base::Call { path, args } => write!(f, "{path}({args})")?,
            Base::Array(inner) => write!(f, "z.array({inner})")?,
            Base::Object(entries) => {
                if entries.is_empty() {
                    f.write_str("z.object({})")?;
                } else {
                    f.write_str("z.object({ ")?;
                    for (i, (key, expr)) in entries.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}: {}", object_key(key), expr)?;
                    }
                    f.write_str(" })")?;
                }
            }
            Base::Union(items) => {
                f.write_str("z.union([")?;
                for (i, expr) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{expr}")?;
                }
                f.write_str("])")?;
            }
            Base::Deferred(symbol) => write!(f, "z.lazy(() => {symbol})")?,
            Base::Ref(symbol) => f.write_str(symbol)?,
        }
        for modifier in &self.modifiers {
            write!(f, "{modifier}")?;
        }
        Ok(())
    }
}

/// Render an object key, quoting it when it is not a plain identifier.
#[must_use]
pub fn object_key(key: &str) -> String {
    let mut chars = key.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(is_ident_char);
    if valid {
        key.to_string()
    } else {
        serde_json::Value::String(key.to_string()).to_string()
    }
}

/// Parse a modifier chain such as `.min(1).max(10)`.
///
/// A leading dot is optional. Every segment must be a call; nested
/// parentheses, brackets, braces, string literals and regex literals inside
/// arguments are skipped as a unit.
pub fn parse_chain(text: &str) -> Result<Vec<Modifier>> {
    let chars: Vec<char> = text.chars().collect();
    let mut modifiers = Vec::new();
    let mut i = 0;
    let mut first = true;

    loop {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }
        if chars[i] == '.' {
            i += 1;
        } else if !first {
            return Err(Error::expression(text, format!("expected `.` at offset {i}")));
        }
        first = false;

        let start = i;
        while i < chars.len() && is_ident_char(chars[i]) {
            i += 1;
        }
        if start == i {
            return Err(Error::expression(
                text,
                format!("expected modifier name at offset {start}"),
            ));
        }
        let name: String = chars[start..i].iter().collect();

        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= chars.len() || chars[i] != '(' {
            return Err(Error::expression(text, format!("expected `(` after `{name}`")));
        }
        let close = matching_close(&chars, i)
            .ok_or_else(|| Error::expression(text, "unbalanced parentheses"))?;
        let args: String = chars[i + 1..close]
            .iter()
            .collect::<String>()
            .trim()
            .to_string();
        modifiers.push(Modifier { name, args });
        i = close + 1;
    }

    Ok(modifiers)
}

/// Index of the bracket closing the one at `open`.
///
/// Returns `None` if the input ends first or brackets are mismatched.
#[must_use]
pub fn matching_close(chars: &[char], open: usize) -> Option<usize> {
    let opener = *chars.get(open)?;
    let closer = match opener {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        _ => return None,
    };

    let mut stack: Vec<char> = Vec::new();
    let mut prev_significant: Option<char> = None;
    let mut i = open;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' | '`' => {
                i = skip_string(chars, i)?;
                prev_significant = Some(c);
                continue;
            }
            '/' if regex_allowed(prev_significant) && i > open => {
                i = skip_regex(chars, i)?;
                prev_significant = Some('/');
                continue;
            }
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ')' | ']' | '}' => {
                if stack.pop()? != c {
                    return None;
                }
                if stack.is_empty() {
                    return (c == closer).then_some(i);
                }
            }
            _ => {}
        }
        if !c.is_whitespace() {
            prev_significant = Some(c);
        }
        i += 1;
    }
    None
}

fn skip_string(chars: &[char], start: usize) -> Option<usize> {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

fn skip_regex(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    let mut in_class = false;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '[' => {
                in_class = true;
                i += 1;
            }
            ']' => {
                in_class = false;
                i += 1;
            }
            '/' if !in_class => return Some(i + 1),
            '\n' => return None,
            _ => i += 1,
        }
    }
    None
}

fn regex_allowed(prev: Option<char>) -> bool {
    prev.is_none_or(|c| "(,=:[!&|?{};".contains(c))
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_symbol_path(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
                && chars.all(is_ident_char)
        })
}

fn lazy_target(args: &str) -> Option<String> {
    let body = args
        .trim()
        .strip_prefix("()")?
        .trim_start()
        .strip_prefix("=>")?
        .trim();
    is_symbol_path(body).then(|| body.to_string())
}
