//! Index module rendering.

use crate::output::{MODULE_EXTENSION, OutputModule};

/// File name of the index module.
pub const INDEX_FILE: &str = "index.ts";

/// One module to re-export from the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Entity name the module was generated for; the sort key.
    pub name: String,
    /// Module file name, with or without extension.
    pub file_name: String,
}

impl IndexEntry {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
        }
    }

    fn specifier(&self) -> &str {
        let suffix = format!(".{MODULE_EXTENSION}");
        self.file_name
            .strip_suffix(suffix.as_str())
            .unwrap_or(&self.file_name)
    }
}

/// Render an index module re-exporting every entry, sorted by name.
pub fn render_index(mut entries: Vec<IndexEntry>) -> OutputModule {
    entries.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
    entries.dedup();

    let mut content = String::new();
    for entry in &entries {
        content.push_str(&format!("export * from \"./{}\";\n", entry.specifier()));
    }

    tracing::debug!(
        target: "schemaforge::render",
        modules = entries.len(),
        "Rendered index module"
    );

    OutputModule {
        file_name: INDEX_FILE.to_string(),
        content,
        ..OutputModule::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_sorted_by_name() {
        let index = render_index(vec![
            IndexEntry::new("User", "User.schema.ts"),
            IndexEntry::new("Comment", "Comment.schema.ts"),
            IndexEntry::new("Role", "Role.schema"),
        ]);
        assert_eq!(index.file_name, "index.ts");
        assert_eq!(
            index.content,
            "export * from \"./Comment.schema\";\n\
             export * from \"./Role.schema\";\n\
             export * from \"./User.schema\";\n"
        );
    }

    #[test]
    fn test_empty_index() {
        assert!(render_index(Vec::new()).content.is_empty());
    }
}
