pub mod page_file;
pub mod page_index;

pub use page_file::{PAGE_EXTENSION, PageFile};
pub use page_index::PageIndex;
