//! Rendered output modules.

/// Extension appended to every generated module file name.
pub const MODULE_EXTENSION: &str = "ts";

/// One generated module, ready to be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputModule {
    /// File name including extension (`User.schema.ts`).
    pub file_name: String,
    pub content: String,
    /// Identifiers imported by the module, in import-block order.
    pub imports: Vec<String>,
    /// Symbols exported by the module.
    pub exports: Vec<String>,
    /// Schema symbols of other models the module depends on.
    pub dependencies: Vec<String>,
    /// Non-fatal problems met while rendering.
    pub warnings: Vec<String>,
}

impl OutputModule {
    /// Build a module file name from a resolved file stem.
    #[must_use]
    pub fn file_name_for(stem: &str) -> String {
        format!("{stem}.{MODULE_EXTENSION}")
    }

    /// Content lines that do not carry the generation timestamp.
    ///
    /// Two renders of the same composition are identical in these lines.
    pub fn stable_lines(&self) -> impl Iterator<Item = &str> {
        self.content
            .lines()
            .filter(|line| !line.contains(crate::assembler::TIMESTAMP_LABEL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_for() {
        assert_eq!(OutputModule::file_name_for("User.schema"), "User.schema.ts");
    }

    #[test]
    fn test_stable_lines_skip_timestamp() {
        let module = OutputModule {
            content: " * Generated at: 2024-01-01T00:00:00Z\nexport const A = 1;".to_string(),
            ..OutputModule::default()
        };
        let lines: Vec<&str> = module.stable_lines().collect();
        assert_eq!(lines, vec!["export const A = 1;"]);
    }
}
