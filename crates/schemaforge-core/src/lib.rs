//! Core types and traits for schemaforge.
//!
//! `schemaforge-core` is the **foundation layer** of the workspace. It defines
//! the descriptors the engine reads, the configuration it is driven by, and
//! the structured expression type it produces.
//!
//! # Role In The Architecture
//!
//! - **Data model**: [`FieldDescriptor`], [`ModelDescriptor`] and
//!   [`EnumDescriptor`] describe an already-parsed data model.
//! - **Configuration**: [`GeneratorConfig`] is built once per run and shared
//!   read-only by every component.
//! - **Expressions**: [`Expr`] is the builder-chain AST the mapper produces and
//!   the renderer prints.
//! - **Collaborators**: [`NamingResolver`] and [`AnnotationExtractor`] are the
//!   seams for naming templates and inline `@zod` directives, with default
//!   implementations.
//!
//! # Who Uses This Crate
//!
//! - `schemaforge-mapper` maps fields and composes models.
//! - `schemaforge-render` renders compositions into output modules.
//! - `schemaforge` orchestrates whole runs and re-exports everything here.

pub mod annotation;
pub mod config;
pub mod error;
pub mod expr;
pub mod field;
pub mod import;
pub mod model;
pub mod naming;
pub mod relationship;
pub mod validate;

pub use annotation::{
    AnnotationExtractor, CommentAnnotationExtractor, Directive, DirectiveTarget, Extraction,
    FieldContext,
};
pub use config::{
    BigIntFormat, BytesConfig, BytesFormat, BytesRepresentation, DatabaseProvider, DateTimeConfig,
    DateTimeStrategy, DecimalConfig, DecimalMode, GeneratorConfig, JsonConfig, JsonMode,
    JsonSchemaCompat, JsonSchemaDateFormat, OptionalFieldBehavior, TargetVersion, TimezonePolicy,
};
pub use error::{Error, Result};
pub use expr::{Base, Expr, Modifier, parse_chain};
pub use field::{DefaultValue, FieldDescriptor, FieldKind, ScalarKind};
pub use import::Import;
pub use model::{EnumDescriptor, ModelDescriptor};
pub use naming::{EntityKind, NamingResolver, PatternNamingResolver, ResolvedName};
pub use relationship::{RelationInfo, RelationRole, RelationshipKind};
pub use validate::{matches_pattern, regex_literal, validate_pattern};
