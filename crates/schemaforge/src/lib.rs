//! schemaforge: runtime-validation schemas from data-model descriptions.
//!
//! `schemaforge` is the **facade crate** of the workspace. It re-exports the
//! descriptor and configuration types, and drives whole runs.
//!
//! # Pipeline
//!
//! 1. [`ModelComposer`] maps every field of a model into a structured
//!    [`Expr`] (type strategy, annotation directives, optionality).
//! 2. [`FileAssembler`] renders each composition into an [`OutputModule`].
//! 3. [`build_graph`] resolves cross-model references and reports missing
//!    dependencies and cycles.
//! 4. [`Generator::generate`] runs all of the above, renders enum modules and
//!    the index, and fills a [`GenerationSummary`].
//!
//! Nothing in a run is fatal except an inconsistent configuration, which
//! [`Generator::new`] rejects up front.
//!
//! # Example
//!
//! ```
//! use schemaforge::prelude::*;
//!
//! let user = ModelDescriptor::new("User")
//!     .field(FieldDescriptor::scalar("id", "Int").id())
//!     .field(FieldDescriptor::scalar("email", "String").doc("@zod.email()"));
//!
//! let generator = Generator::new(GeneratorConfig::default()).unwrap();
//! let collection = generator.generate(&[user], &[]);
//!
//! let module = collection.module("User").unwrap();
//! assert!(module.content.contains("email: z.string().email(),"));
//! println!("{}", collection.summary.render_plain());
//! ```

pub mod collection;
pub mod graph;
pub mod summary;

pub use schemaforge_core::{
    AnnotationExtractor, BytesConfig, CommentAnnotationExtractor, DateTimeConfig, DecimalConfig,
    DefaultValue, EntityKind, EnumDescriptor, Error, Expr, FieldDescriptor, FieldKind,
    GeneratorConfig, Import, JsonConfig, Modifier, ModelDescriptor, NamingResolver,
    PatternNamingResolver, RelationInfo, ResolvedName, Result, ScalarKind,
};
pub use schemaforge_mapper::{
    ComposedFieldSchema, GenerationStatistics, MapperContext, ModelComposer,
    ModelSchemaComposition, OptionalityReason,
};
pub use schemaforge_render::{FileAssembler, OutputModule};

pub use collection::{Generator, SchemaCollection, SchemaEntry};
pub use graph::{GraphReport, MissingDependency, build_graph, find_cycles};
pub use summary::GenerationSummary;

/// Everything needed for a typical run.
pub mod prelude {
    pub use crate::collection::{Generator, SchemaCollection};
    pub use crate::graph::{GraphReport, build_graph};
    pub use crate::summary::GenerationSummary;
    pub use schemaforge_core::{
        DecimalConfig, DecimalMode, DefaultValue, EnumDescriptor, Error, FieldDescriptor,
        GeneratorConfig, ModelDescriptor, OptionalFieldBehavior, RelationInfo, Result,
    };
    pub use schemaforge_mapper::{ModelSchemaComposition, OptionalityReason};
    pub use schemaforge_render::OutputModule;
}
