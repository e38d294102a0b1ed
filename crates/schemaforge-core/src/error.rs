//! Error types for schemaforge.
//!
//! Every component degrades locally instead of aborting a run, so most of
//! these errors are produced, logged and converted into a fallback value at
//! the boundary that owns them. Only [`Error::Config`] is expected to reach a
//! caller unchanged.

use thiserror::Error;

/// Convenient result alias used across the schemaforge crates.
pub type Result<T> = std::result::Result<T, Error>;

/// The error taxonomy of the composition engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration object is internally inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A naming template could not be applied to an entity name.
    #[error("cannot resolve name for {kind} `{base}`: {reason}")]
    Naming {
        kind: &'static str,
        base: String,
        reason: String,
    },

    /// Annotation extraction or merging failed for a field or model.
    #[error("annotation error on `{target}`: {reason}")]
    Annotation { target: String, reason: String },

    /// An expression or modifier chain could not be parsed.
    #[error("cannot parse expression `{input}`: {reason}")]
    Expression { input: String, reason: String },

    /// The type mapper could not produce an expression for a field.
    #[error("cannot map field `{model}.{field}`: {reason}")]
    FieldMapping {
        model: String,
        field: String,
        reason: String,
    },

    /// A whole model could not be composed.
    #[error("cannot compose model `{model}`: {reason}")]
    Composition { model: String, reason: String },

    /// A composition could not be rendered into an output module.
    #[error("cannot render module for `{model}`: {reason}")]
    Render { model: String, reason: String },

    /// JSON (de)serialization failure, e.g. while loading configuration.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a field-mapping error.
    pub fn field_mapping(
        model: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::FieldMapping {
            model: model.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a model-composition error.
    pub fn composition(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Composition {
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// Build an expression-parsing error.
    pub fn expression(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Expression {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Build an annotation error.
    pub fn annotation(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Annotation {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_mapping_display() {
        let err = Error::field_mapping("User", "email", "boom");
        assert_eq!(err.to_string(), "cannot map field `User.email`: boom");
    }

    #[test]
    fn test_json_error_is_transparent() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let msg = json_err.to_string();
        let err: Error = json_err.into();
        assert_eq!(err.to_string(), msg);
    }
}
