//! Consistency checks for a [`Page`]'s derived tree.
//!
//! - every level is within 1..=6
//! - every child is deeper than its parent
//! - siblings share one depth, parent depth + 1 (roots at 1)
//! - pre-order traversal from the roots reproduces the flat order

use thiserror::Error;

use crate::{
    document::{Page, SectionId},
    parsing::heading::{MAX_LEVEL, MIN_LEVEL},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("section {header:?} has level {level}")]
    LevelOutOfRange { header: String, level: u8 },
    #[error("child {child:?} is not deeper than parent {parent:?}")]
    ChildNotDeeper { parent: String, child: String },
    #[error("section {header:?} has depth {found}, expected {expected}")]
    DepthMismatch {
        header: String,
        expected: usize,
        found: usize,
    },
    #[error("section {header:?} does not point back to its parent")]
    ParentMismatch { header: String },
    #[error("tree traversal does not reproduce the flat order")]
    FlattenMismatch,
}

/// Collect every violated invariant. An empty list means the page is sound.
pub fn check(page: &Page) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (id, section) in page.sections() {
        let level = section.level();
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            violations.push(Violation::LevelOutOfRange {
                header: section.header.clone(),
                level,
            });
        }
        let children = page.children(id).unwrap_or_default();
        for &child_id in children {
            let Ok(child) = page.section(child_id) else {
                continue;
            };
            if child.level() <= level {
                violations.push(Violation::ChildNotDeeper {
                    parent: section.header.clone(),
                    child: child.header.clone(),
                });
            }
            if page.parent(child_id).ok().flatten() != Some(id) {
                violations.push(Violation::ParentMismatch {
                    header: child.header.clone(),
                });
            }
        }
    }

    let mut visited = Vec::with_capacity(page.len());
    for &root in page.root_sections() {
        walk(page, root, 1, &mut visited, &mut violations);
    }
    if visited != page.section_ids() {
        violations.push(Violation::FlattenMismatch);
    }

    violations
}

fn walk(
    page: &Page,
    id: SectionId,
    expected: usize,
    visited: &mut Vec<SectionId>,
    violations: &mut Vec<Violation>,
) {
    visited.push(id);
    let found = page.depth(id).unwrap_or_default();
    if found != expected {
        let header = page
            .section(id)
            .map(|section| section.header.clone())
            .unwrap_or_default();
        violations.push(Violation::DepthMismatch {
            header,
            expected,
            found,
        });
    }
    for &child in page.children(id).unwrap_or_default() {
        walk(page, child, expected + 1, visited, violations);
    }
}

/// Panic with every violation listed if the page is inconsistent.
pub fn assert_valid(page: &Page) {
    let violations = check(page);
    assert!(
        violations.is_empty(),
        "page {:?} violates tree invariants:\n{}",
        page.title(),
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}
