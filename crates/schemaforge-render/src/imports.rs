//! Import block rendering.
//!
//! Only imports that the rendered code actually references are emitted, so a
//! directive that replaced a generated expression never leaves a dangling
//! import behind.

use std::collections::BTreeSet;

use schemaforge_core::{EntityKind, Import, NamingResolver, matches_pattern};

/// Module specifier of the validation library.
pub const ZOD_MODULE: &str = "zod";

/// Module specifier of the ORM client carrying the decimal class.
pub const PRISMA_MODULE: &str = "@prisma/client";

/// Whether `code` references `identifier` as a whole word.
pub fn references_identifier(code: &str, identifier: &str) -> bool {
    let pattern = format!(
        r"(?:^|[^A-Za-z0-9_$]){}(?:$|[^A-Za-z0-9_$])",
        regex::escape(identifier)
    );
    matches_pattern(code, &pattern)
}

/// Imports referenced by `code`, excluding `own_symbol`.
pub fn used_imports<'a>(
    imports: &'a BTreeSet<Import>,
    code: &str,
    own_symbol: &str,
) -> Vec<&'a Import> {
    imports
        .iter()
        .filter(|import| import.identifier() != own_symbol)
        .filter(|import| references_identifier(code, import.identifier()))
        .collect()
}

/// Render one import statement.
///
/// Generated symbols are located by mapping them back to their entity and
/// resolving that entity's file name; `warnings` receives a note when that
/// round trip fails.
pub fn import_statement(
    import: &Import,
    naming: &dyn NamingResolver,
    warnings: &mut Vec<String>,
) -> String {
    let (symbol, kind) = match import {
        Import::Zod => return format!("import {{ z }} from \"{ZOD_MODULE}\";"),
        Import::Prisma => return format!("import {{ Prisma }} from \"{PRISMA_MODULE}\";"),
        Import::Enum(symbol) => (symbol, EntityKind::Enum),
        Import::Model(symbol) => (symbol, EntityKind::Model),
    };

    let file = naming
        .base_name(kind, symbol)
        .and_then(|base| naming.resolve(kind, &base).ok())
        .map(|names| names.file_name);

    let file = file.unwrap_or_else(|| {
        tracing::warn!(
            target: "schemaforge::render",
            symbol = %symbol,
            "Cannot locate module for symbol, importing by symbol name"
        );
        warnings.push(format!("Cannot resolve module for `{symbol}`"));
        symbol.clone()
    });
    format!("import {{ {symbol} }} from \"./{file}\";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaforge_core::PatternNamingResolver;

    #[test]
    fn test_references_identifier_is_word_bounded() {
        assert!(references_identifier("z.lazy(() => UserSchema)", "UserSchema"));
        assert!(!references_identifier("z.lazy(() => AdminUserSchema)", "UserSchema"));
        assert!(!references_identifier("UserSchemaV2", "UserSchema"));
        assert!(references_identifier("z.string()", "z"));
        assert!(!references_identifier("foo.bar()", "z"));
        assert!(references_identifier("z.instanceof(Prisma.Decimal)", "Prisma"));
    }

    #[test]
    fn test_used_imports_filters_unreferenced_and_self() {
        let imports: BTreeSet<Import> = [
            Import::Zod,
            Import::Prisma,
            Import::Model("UserSchema".to_string()),
            Import::Model("PostSchema".to_string()),
        ]
        .into_iter()
        .collect();
        let code =
            "z.object({ author: z.lazy(() => UserSchema), parent: z.lazy(() => PostSchema) })";
        let used: Vec<&str> = used_imports(&imports, code, "PostSchema")
            .into_iter()
            .map(Import::identifier)
            .collect();
        assert_eq!(used, vec!["z", "UserSchema"]);
    }

    #[test]
    fn test_import_statements() {
        let naming = PatternNamingResolver::default();
        let mut warnings = Vec::new();
        assert_eq!(
            import_statement(&Import::Zod, &naming, &mut warnings),
            "import { z } from \"zod\";"
        );
        let role = Import::Enum("RoleSchema".to_string());
        assert_eq!(
            import_statement(&role, &naming, &mut warnings),
            "import { RoleSchema } from \"./Role.schema\";"
        );
        assert!(warnings.is_empty());

        let stmt = import_statement(&Import::Model("Stray".to_string()), &naming, &mut warnings);
        assert_eq!(stmt, "import { Stray } from \"./Stray\";");
        assert_eq!(warnings.len(), 1);
    }
}
