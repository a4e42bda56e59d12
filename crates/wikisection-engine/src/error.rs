use thiserror::Error;

/// Errors raised while turning wikitext into a [`Page`](crate::Page).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed section header: {0:?}")]
    MalformedHeader(String),
}

/// A mutation was rejected because it would break the section tree.
///
/// Every check runs before the page is touched, so a returned error means
/// the page is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("Section is not attached to a page")]
    Detached,
    #[error("Heading level {0} is outside 1..=6")]
    LevelOutOfRange(i16),
    #[error("Level shift {0} is outside -5..=-1 or 1..=5")]
    InvalidShift(i8),
    #[error("Child level {child} must be greater than parent level {parent}")]
    NotDeeper { parent: u8, child: u8 },
    #[error("Sibling level {found} must equal level {expected}")]
    LevelMismatch { expected: u8, found: u8 },
}

/// Traversal was requested on a handle that no longer points into the page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Section is not attached to a page")]
    Detached,
}

impl From<NavigationError> for StructureError {
    fn from(err: NavigationError) -> Self {
        match err {
            NavigationError::Detached => StructureError::Detached,
        }
    }
}
