/*!
 * # Section Document Model
 *
 * A [`Page`] is an intro block followed by a flat, ordered sequence of
 * [`Section`]s. The flat sequence is the only stored structure: which
 * section is the parent, child or sibling of which is *derived* from the
 * heading levels by the tree builder and recomputed after every structural
 * edit.
 *
 * ## Module Structure
 *
 * - **`text_block`**: blank-line bookkeeping shared by page intros, section
 *   bodies and fields
 * - **`section`**: a single section (heading + body), its parser and printer,
 *   and the detached/owned form used to build or move subtrees
 * - **`page`**: the arena that owns attached sections, navigation, printing
 * - **`tree`**: the tree builder deriving depth/parent/children from levels
 * - **`mutation`**: structural edits that keep the flat sequence and the
 *   derived tree consistent
 *
 * ## Round-trip
 *
 * ```rust
 * use wikisection_engine::Page;
 *
 * let text = "==A==\nfoo\n===B===\nbar\n==C==\nbaz";
 * let page = Page::parse("kot", text).unwrap();
 * assert_eq!(page.to_string(), text);
 * ```
 */

pub mod mutation;
pub mod page;
pub mod section;
pub mod text_block;
pub mod tree;

pub use crate::parsing::HeaderFormat;
pub use page::{Page, SectionId};
pub use section::{Section, SectionMut};
pub use text_block::TextBlock;
