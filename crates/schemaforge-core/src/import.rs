//! Import identifiers required by generated expressions.

use serde::{Deserialize, Serialize};

/// One identifier a generated module may need to import.
///
/// Ordering is deterministic: library imports first, then enum and model
/// schema symbols by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Import {
    /// The validation library namespace (`z`).
    Zod,
    /// The ORM client namespace that carries the arbitrary-precision decimal
    /// class (`Prisma`).
    Prisma,
    /// An enum schema symbol (`RoleSchema`).
    Enum(String),
    /// A model schema symbol (`UserSchema`).
    Model(String),
}

impl Import {
    /// The identifier brought into scope.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Import::Zod => "z",
            Import::Prisma => "Prisma",
            Import::Enum(symbol) | Import::Model(symbol) => symbol,
        }
    }

    /// Whether this is a library import rather than a generated symbol.
    #[must_use]
    pub fn is_library(&self) -> bool {
        matches!(self, Import::Zod | Import::Prisma)
    }

    /// The model schema symbol, if this import refers to another model.
    #[must_use]
    pub fn model_symbol(&self) -> Option<&str> {
        match self {
            Import::Model(symbol) => Some(symbol),
            _ => None,
        }
    }
}
