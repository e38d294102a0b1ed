//! Field mapping and model composition for schemaforge.
//!
//! `schemaforge-mapper` holds the decision logic of the engine:
//!
//! - [`TypeMapper`] turns one field into a validation expression, applying
//!   the configured Decimal, DateTime, Json and Bytes strategies.
//! - [`optionality::resolve`] classifies why a field may be omitted.
//! - [`merge::merge_directives`] folds annotation chains into generated
//!   expressions.
//! - [`ModelComposer`] runs all of the above over a model and aggregates
//!   imports, exports and statistics.
//!
//! All entry points take a [`MapperContext`]; nothing reads global state.

pub mod composer;
pub mod context;
pub mod docs;
pub mod literal;
pub mod merge;
pub mod optionality;
pub mod type_mapper;

pub use composer::{
    ComposedFieldSchema, GenerationMetadata, GenerationStatistics, ModelComposer,
    ModelSchemaComposition,
};
pub use context::MapperContext;
pub use merge::{MergeOutcome, merge_directives};
pub use optionality::{OptionalityReason, OptionalityResult, is_auto_generated};
pub use type_mapper::{FieldMappingResult, TypeMapper, map_field};
