//! Explicit collaborators threaded through every mapping call.

use schemaforge_core::{
    AnnotationExtractor, EntityKind, GeneratorConfig, NamingResolver, ResolvedName,
};

/// Everything a mapping or composition step may consult.
///
/// The context only borrows; one context is built per run and copied freely.
#[derive(Clone, Copy)]
pub struct MapperContext<'a> {
    pub config: &'a GeneratorConfig,
    pub naming: &'a dyn NamingResolver,
    pub annotations: &'a dyn AnnotationExtractor,
}

impl<'a> MapperContext<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        naming: &'a dyn NamingResolver,
        annotations: &'a dyn AnnotationExtractor,
    ) -> Self {
        Self {
            config,
            naming,
            annotations,
        }
    }

    /// Resolve names for a referenced entity.
    ///
    /// Falls back to the `<Base>Schema` convention when the resolver fails;
    /// the failure is returned as a warning.
    pub fn names_or_conventional(
        &self,
        kind: EntityKind,
        base: &str,
    ) -> (ResolvedName, Option<String>) {
        match self.naming.resolve(kind, base) {
            Ok(names) => (names, None),
            Err(e) => {
                tracing::warn!(
                    target: "schemaforge::mapper",
                    kind = %kind,
                    base = base,
                    error = %e,
                    "Naming resolution failed, using conventional name"
                );
                (
                    ResolvedName::conventional(base),
                    Some(format!("{e}; using `{base}Schema`")),
                )
            }
        }
    }
}

impl std::fmt::Debug for MapperContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapperContext")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
