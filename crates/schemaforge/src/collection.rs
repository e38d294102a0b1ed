//! Collection orchestration.
//!
//! [`Generator`] composes and renders every model and enum of a run, builds
//! the dependency graph once all compositions exist, and renders the index.
//! A failing model is recorded and skipped; the run always completes.

use std::collections::{BTreeMap, BTreeSet};

use schemaforge_core::{
    AnnotationExtractor, CommentAnnotationExtractor, EnumDescriptor, GeneratorConfig, Import,
    ModelDescriptor, NamingResolver, PatternNamingResolver, Result,
};
use schemaforge_mapper::{MapperContext, ModelComposer, ModelSchemaComposition};
use schemaforge_render::{FileAssembler, IndexEntry, OutputModule, render_enum, render_index};

use crate::graph::{GraphReport, build_graph};
use crate::summary::GenerationSummary;

/// Per-model outcome.
#[derive(Debug, Clone, Default)]
pub struct SchemaEntry {
    /// Present when composition succeeded.
    pub composition: Option<ModelSchemaComposition>,
    /// Present when rendering succeeded.
    pub output: Option<OutputModule>,
    pub errors: Vec<String>,
}

impl SchemaEntry {
    /// Whether the model produced a module.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.output.is_some()
    }
}

/// Everything produced by one run.
#[derive(Debug, Clone, Default)]
pub struct SchemaCollection {
    /// Model name to outcome.
    pub schemas: BTreeMap<String, SchemaEntry>,
    /// Enum name to rendered module.
    pub enums: BTreeMap<String, OutputModule>,
    /// Model name to the models it references.
    pub dependencies: BTreeMap<String, BTreeSet<String>>,
    /// Union of every composed model's imports.
    pub imports: BTreeSet<Import>,
    pub index: OutputModule,
    pub graph: GraphReport,
    pub summary: GenerationSummary,
}

impl SchemaCollection {
    /// Rendered module for a model.
    pub fn module(&self, model: &str) -> Option<&OutputModule> {
        self.schemas.get(model).and_then(|e| e.output.as_ref())
    }

    /// Composition for a model.
    pub fn composition(&self, model: &str) -> Option<&ModelSchemaComposition> {
        self.schemas.get(model).and_then(|e| e.composition.as_ref())
    }

    /// Every generated module: models, then enums, then the index.
    pub fn modules(&self) -> impl Iterator<Item = &OutputModule> {
        self.schemas
            .values()
            .filter_map(|e| e.output.as_ref())
            .chain(self.enums.values())
            .chain(std::iter::once(&self.index))
    }
}

/// Runs composition and rendering over a whole data model.
pub struct Generator {
    config: GeneratorConfig,
    naming: Box<dyn NamingResolver>,
    annotations: Box<dyn AnnotationExtractor>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Generator {
    /// Create a generator with the default collaborators.
    ///
    /// Fails when the configuration is inconsistent.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            naming: Box::new(PatternNamingResolver::default()),
            annotations: Box::new(CommentAnnotationExtractor::new()),
        })
    }

    /// Replace the naming resolver.
    #[must_use]
    pub fn with_naming(mut self, naming: impl NamingResolver + 'static) -> Self {
        self.naming = Box::new(naming);
        self
    }

    /// Replace the annotation extractor.
    #[must_use]
    pub fn with_annotations(mut self, annotations: impl AnnotationExtractor + 'static) -> Self {
        self.annotations = Box::new(annotations);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn context(&self) -> MapperContext<'_> {
        MapperContext::new(
            &self.config,
            self.naming.as_ref(),
            self.annotations.as_ref(),
        )
    }

    /// Compose a single model.
    pub fn compose(&self, model: &ModelDescriptor) -> Result<ModelSchemaComposition> {
        ModelComposer::new(self.context()).compose(model)
    }

    /// Render a single composition.
    pub fn render(&self, composition: &ModelSchemaComposition) -> Result<OutputModule> {
        FileAssembler::new(&self.config, self.naming.as_ref())
            .render(composition)
    }

    /// Compose and render every model and enum.
    pub fn generate(
        &self,
        models: &[ModelDescriptor],
        enums: &[EnumDescriptor],
    ) -> SchemaCollection {
        tracing::info!(
            models = models.len(),
            enums = enums.len(),
            fingerprint = %self.config.fingerprint(),
            "Starting schema generation"
        );

        let mut collection = SchemaCollection::default();
        let summary = &mut collection.summary;
        summary.models_total = models.len();
        summary.enums_total = enums.len();

        for model in models {
            if collection.schemas.contains_key(&model.name) {
                tracing::warn!(model = %model.name, "Duplicate model name, skipping");
                collection
                    .summary
                    .record_failure(format!("{}: duplicate model name", model.name));
                continue;
            }

            let entry = self.generate_model(model, &mut collection.summary);
            if let Some(composition) = &entry.composition {
                collection
                    .imports
                    .extend(composition.imports.iter().cloned());
            }
            collection.schemas.insert(model.name.clone(), entry);
        }

        let graph = build_graph(
            collection
                .schemas
                .values()
                .filter_map(|e| e.composition.as_ref()),
        );
        collection.summary.cycles = graph.cycles.clone();
        collection.summary.missing_dependencies =
            graph.errors.iter().map(ToString::to_string).collect();
        collection.dependencies = graph.edges.clone();
        collection.graph = graph;

        for descriptor in enums {
            match render_enum(descriptor, &self.config, self.naming.as_ref()) {
                Ok(module) => {
                    collection.summary.enums_rendered += 1;
                    collection.enums.insert(descriptor.name.clone(), module);
                }
                Err(e) => {
                    tracing::warn!(name = %descriptor.name, error = %e, "Enum rendering failed");
                    collection
                        .summary
                        .warnings
                        .push(format!("{}: {e}", descriptor.name));
                }
            }
        }

        let entries = collection
            .schemas
            .iter()
            .filter_map(|(name, entry)| {
                entry
                    .output
                    .as_ref()
                    .map(|m| IndexEntry::new(name.clone(), m.file_name.clone()))
            })
            .chain(
                collection
                    .enums
                    .iter()
                    .map(|(name, m)| IndexEntry::new(name.clone(), m.file_name.clone())),
            )
            .collect();
        collection.index = render_index(entries);

        tracing::info!(
            processed = collection.summary.models_processed,
            failed = collection.summary.models_failed,
            cycles = collection.summary.cycles.len(),
            "Schema generation finished"
        );
        collection
    }

    fn generate_model(
        &self,
        model: &ModelDescriptor,
        summary: &mut GenerationSummary,
    ) -> SchemaEntry {
        let mut entry = SchemaEntry::default();

        let composition = match self.compose(model) {
            Ok(composition) => composition,
            Err(e) => {
                tracing::warn!(model = %model.name, error = %e, "Model composition failed");
                entry.errors.push(e.to_string());
                summary.record_failure(format!("{}: {e}", model.name));
                return entry;
            }
        };

        summary.fields_total += composition.statistics.total_fields;
        summary.fallback_fields += composition.statistics.fallback_fields;
        for warning in &composition.warnings {
            summary.warnings.push(format!("{}.{warning}", model.name));
        }

        match self.render(&composition) {
            Ok(module) => {
                for warning in &module.warnings {
                    summary.warnings.push(format!("{}: {warning}", model.name));
                }
                summary.models_processed += 1;
                entry.output = Some(module);
            }
            Err(e) => {
                tracing::warn!(model = %model.name, error = %e, "Model rendering failed");
                entry.errors.push(e.to_string());
                summary.record_failure(format!("{}: {e}", model.name));
            }
        }
        entry.composition = Some(composition);
        entry
    }
}
