pub mod document;
pub mod error;
pub mod fields;
pub mod invariants;
pub mod io;
pub mod models;
pub mod outline;
pub mod parsing;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use document::{HeaderFormat, Page, Section, SectionId, SectionMut, TextBlock};
pub use error::{NavigationError, ParseError, StructureError};
pub use fields::{DefinitionGroup, Field, FieldKind, FieldSet};
pub use io::*;
pub use models::{page_file::*, page_index::*};
