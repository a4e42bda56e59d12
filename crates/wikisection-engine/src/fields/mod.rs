//! # Dictionary Fields
//!
//! Dictionary entry sections are made of a fixed vocabulary of fields, each
//! introduced by a marker template on its own (`{{znaczenia}}`,
//! `{{tłumaczenia}}`, ...). This module parses those out of a section body
//! and prints them back.
//!
//! - **`kind`**: the closed vocabulary and its markers
//! - **`field`**: a single field with its blank-line bookkeeping
//! - **`set`**: the ordered set of fields of one section
//! - **`definitions`**: grouping of definition lines under part-of-speech
//!   headers

pub mod definitions;
pub mod field;
pub mod kind;
pub mod set;

pub use definitions::DefinitionGroup;
pub use field::Field;
pub use kind::{FieldKind, VOCABULARY_VERSION};
pub use set::FieldSet;
