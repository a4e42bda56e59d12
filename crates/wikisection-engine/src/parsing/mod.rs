//! # Wikitext Parsing
//!
//! Turns raw page text into the pieces the document model is built from.
//!
//! ## Pipeline
//!
//! 1. **`ranges`**: finds comment and verbatim spans that heading and field
//!    marker detection must not look into
//! 2. **`split`**: cuts the page into an intro chunk plus one chunk per
//!    heading line, without consuming any characters
//! 3. **`heading`**: recognizes a single heading line and captures its exact
//!    spacing and decoration
//!
//! Concatenating the intro and all chunks returned by the splitter always
//! reproduces the input byte for byte; everything above this layer relies on
//! that to keep the round-trip guarantee.

pub mod heading;
pub mod ranges;
pub mod split;

pub use heading::{HeaderFormat, HeadingLine, parse_heading_line};
pub use ranges::{Delimiters, IgnoredRanges};
pub use split::{SplitPage, split_sections};
