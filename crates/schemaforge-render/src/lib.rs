//! Output rendering for schemaforge.
//!
//! `schemaforge-render` is the last stage of the pipeline. It turns composed
//! models into text modules and never changes what a schema validates.
//!
//! - [`FileAssembler`] renders one model module: header, import block
//!   filtered by actual use, schema definition, type and legacy aliases,
//!   statistics.
//! - [`render_enum`] renders one `z.enum([...])` module.
//! - [`render_index`] renders the re-export index, sorted by name.

pub mod assembler;
pub mod enums;
pub mod imports;
pub mod index;
pub mod output;

pub use assembler::{FileAssembler, TIMESTAMP_LABEL};
pub use enums::render_enum;
pub use imports::{import_statement, references_identifier, used_imports};
pub use index::{INDEX_FILE, IndexEntry, render_index};
pub use output::OutputModule;
