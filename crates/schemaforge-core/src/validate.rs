//! Pattern helpers for generated regular expressions.
//!
//! Every pattern the mapper emits into an expression is compiled here first so
//! that a malformed pattern is caught at generation time instead of inside the
//! generated module. Compiled patterns are cached for the life of the process.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use regex::Regex;

use crate::error::{Error, Result};

/// Thread-safe cache of compiled patterns.
struct RegexCache {
    cache: RwLock<HashMap<String, Regex>>,
}

impl RegexCache {
    fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn get_or_compile(&self, pattern: &str) -> std::result::Result<Regex, regex::Error> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(regex) = cache.get(pattern) {
                return Ok(regex.clone());
            }
        }

        let regex = Regex::new(pattern)?;
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }
}

fn regex_cache() -> &'static RegexCache {
    static CACHE: OnceLock<RegexCache> = OnceLock::new();
    CACHE.get_or_init(RegexCache::new)
}

/// Check whether `value` matches `pattern`.
///
/// An invalid pattern is logged and treated as a non-match.
pub fn matches_pattern(value: &str, pattern: &str) -> bool {
    match regex_cache().get_or_compile(pattern) {
        Ok(regex) => regex.is_match(value),
        Err(e) => {
            tracing::warn!(
                pattern = pattern,
                error = %e,
                "Invalid regex pattern, treating as non-match"
            );
            false
        }
    }
}

/// Compile `pattern`, returning an [`Error::Expression`] when it is invalid.
pub fn validate_pattern(pattern: &str) -> Result<()> {
    regex_cache()
        .get_or_compile(pattern)
        .map(|_| ())
        .map_err(|e| Error::expression(pattern, format!("invalid regex pattern: {e}")))
}

/// Render a validated pattern as a regex literal (`/.../`) for the generated
/// module. Forward slashes are escaped.
pub fn regex_literal(pattern: &str) -> Result<String> {
    validate_pattern(pattern)?;
    let mut out = String::with_capacity(pattern.len() + 2);
    out.push('/');
    let mut escaped = false;
    for c in pattern.chars() {
        if c == '/' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out.push('/');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_decimal_pattern() {
        let pattern = r"^\d{1,3}(\.\d{1,2})?$";
        assert!(matches_pattern("123.45", pattern));
        assert!(matches_pattern("1", pattern));
        assert!(!matches_pattern("1234", pattern));
        assert!(!matches_pattern("1.234", pattern));
    }

    #[test]
    fn test_invalid_pattern_returns_false() {
        assert!(!matches_pattern("test", "[invalid"));
    }

    #[test]
    fn test_validate_pattern() {
        assert!(validate_pattern(r"^[A-Za-z0-9+/]*={0,2}$").is_ok());
        let err = validate_pattern("(unclosed").unwrap_err();
        assert!(err.to_string().contains("invalid regex pattern"));
    }

    #[test]
    fn test_regex_caching() {
        let pattern = r"^[0-9a-fA-F]*$";
        assert!(matches_pattern("deadBEEF", pattern));
        assert!(matches_pattern("00ff", pattern));
        assert!(!matches_pattern("xyz", pattern));
    }

    #[test]
    fn test_regex_literal_escapes_slashes() {
        assert_eq!(
            regex_literal(r"^[A-Za-z0-9+/]*={0,2}$").unwrap(),
            r"/^[A-Za-z0-9+\/]*={0,2}$/"
        );
        assert_eq!(regex_literal(r"^a\/b$").unwrap(), r"/^a\/b$/");
        assert!(regex_literal("(").is_err());
    }
}
