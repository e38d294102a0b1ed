//! Naming resolution for generated symbols and files.
//!
//! The engine never builds a symbol or file name by hand. It asks a
//! [`NamingResolver`] and relies on the resolver's inverse ([`NamingResolver::base_name`])
//! to map a symbol back to the entity it was generated for.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Kind of entity a name is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Model,
    Enum,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Model => "model",
            EntityKind::Enum => "enum",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All names derived for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedName {
    /// Exported schema value (`UserSchema`).
    pub schema_symbol: String,
    /// Exported inferred type alias (`UserType`).
    pub type_symbol: String,
    /// Legacy value alias (`UserModel`).
    pub legacy_symbol: String,
    /// Module file stem without extension (`User.schema`).
    pub file_name: String,
}

impl ResolvedName {
    /// The fixed `<Base>Schema` convention used when resolution fails.
    #[must_use]
    pub fn conventional(base: &str) -> Self {
        Self {
            schema_symbol: format!("{base}Schema"),
            type_symbol: format!("{base}Type"),
            legacy_symbol: format!("{base}Model"),
            file_name: format!("{base}.schema"),
        }
    }
}

/// Resolves entity names into generated symbol and file names.
pub trait NamingResolver {
    /// Resolve every name derived from `base`.
    fn resolve(&self, kind: EntityKind, base: &str) -> Result<ResolvedName>;

    /// Map a schema symbol back to its entity base name.
    ///
    /// Returns `None` when the symbol was not produced by this resolver.
    fn base_name(&self, kind: EntityKind, symbol: &str) -> Option<String>;
}

const PASCAL: &str = "{Model}";
const CAMEL: &str = "{model}";

/// Template-driven naming with `{Model}` / `{model}` placeholders.
///
/// ```
/// use schemaforge_core::naming::{EntityKind, NamingResolver, PatternNamingResolver};
///
/// let naming = PatternNamingResolver::default();
/// let names = naming.resolve(EntityKind::Model, "User").unwrap();
/// assert_eq!(names.schema_symbol, "UserSchema");
/// assert_eq!(naming.base_name(EntityKind::Model, "UserSchema").as_deref(), Some("User"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternNamingResolver {
    pub schema_pattern: String,
    pub type_pattern: String,
    pub legacy_pattern: String,
    pub file_pattern: String,
}

impl Default for PatternNamingResolver {
    fn default() -> Self {
        Self {
            schema_pattern: "{Model}Schema".to_string(),
            type_pattern: "{Model}Type".to_string(),
            legacy_pattern: "{Model}Model".to_string(),
            file_pattern: "{Model}.schema".to_string(),
        }
    }
}

impl PatternNamingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn schema_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.schema_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn type_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.type_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn legacy_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.legacy_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    fn apply(kind: EntityKind, pattern: &str, base: &str, symbol: bool) -> Result<String> {
        let naming_error = |reason: String| Error::Naming {
            kind: kind.as_str(),
            base: base.to_string(),
            reason,
        };

        let placeholders = pattern.matches(PASCAL).count() + pattern.matches(CAMEL).count();
        if placeholders != 1 {
            return Err(naming_error(format!(
                "pattern `{pattern}` must contain exactly one of {PASCAL} or {CAMEL}"
            )));
        }

        let resolved = pattern
            .replace(PASCAL, &pascal_case(base))
            .replace(CAMEL, &camel_case(base));

        if symbol && !is_identifier(&resolved) {
            return Err(naming_error(format!("`{resolved}` is not a valid identifier")));
        }
        if !symbol && (resolved.contains('/') || resolved.contains('\\')) {
            return Err(naming_error(format!("`{resolved}` is not a plain file name")));
        }
        Ok(resolved)
    }
}

impl NamingResolver for PatternNamingResolver {
    fn resolve(&self, kind: EntityKind, base: &str) -> Result<ResolvedName> {
        if !is_identifier(base) {
            return Err(Error::Naming {
                kind: kind.as_str(),
                base: base.to_string(),
                reason: "entity name is not a valid identifier".to_string(),
            });
        }
        Ok(ResolvedName {
            schema_symbol: Self::apply(kind, &self.schema_pattern, base, true)?,
            type_symbol: Self::apply(kind, &self.type_pattern, base, true)?,
            legacy_symbol: Self::apply(kind, &self.legacy_pattern, base, true)?,
            file_name: Self::apply(kind, &self.file_pattern, base, false)?,
        })
    }

    fn base_name(&self, _kind: EntityKind, symbol: &str) -> Option<String> {
        let (placeholder, camel) = if self.schema_pattern.contains(PASCAL) {
            (PASCAL, false)
        } else if self.schema_pattern.contains(CAMEL) {
            (CAMEL, true)
        } else {
            return None;
        };
        let (prefix, suffix) = self.schema_pattern.split_once(placeholder)?;
        let stem = symbol.strip_prefix(prefix)?.strip_suffix(suffix)?;
        if stem.is_empty() {
            return None;
        }
        Some(if camel { pascal_case(stem) } else { stem.to_string() })
    }
}

fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `name` is usable as an identifier in generated code.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
