use std::ops::Range;

use log::trace;

use super::page::{Links, Page, SectionId};

/// Tree position of one entry of a flat level sequence, by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Derived {
    pub depth: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Result of [`derive`]: one entry per input level plus the root indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedTree {
    pub nodes: Vec<Derived>,
    pub roots: Vec<usize>,
}

/// Derive depth, parent and children from a flat sequence of heading levels.
///
/// Within one depth, a level at or below the running minimum starts a new
/// sibling; anything higher belongs to the most recently started sibling and
/// is resolved one depth further down. Gaps between levels are kept as they
/// are.
pub fn derive(levels: &[u8]) -> DerivedTree {
    let mut nodes = vec![Derived::default(); levels.len()];
    let roots = derive_range(levels, 0..levels.len(), 1, None, &mut nodes);
    DerivedTree { nodes, roots }
}

fn derive_range(
    levels: &[u8],
    range: Range<usize>,
    depth: usize,
    parent: Option<usize>,
    nodes: &mut [Derived],
) -> Vec<usize> {
    let mut siblings: Vec<usize> = Vec::new();
    let mut min_level = u8::MAX;

    for i in range.clone() {
        if levels[i] <= min_level {
            min_level = levels[i];
            siblings.push(i);
        }
    }

    for (n, &sibling) in siblings.iter().enumerate() {
        let end = siblings.get(n + 1).copied().unwrap_or(range.end);
        nodes[sibling].depth = depth;
        nodes[sibling].parent = parent;
        let children = derive_range(levels, sibling + 1..end, depth + 1, Some(sibling), nodes);
        nodes[sibling].children = children;
    }

    siblings
}

impl Page {
    /// Recompute every section's links and the root list from the flat order.
    pub(crate) fn rebuild_tree(&mut self) {
        let levels: Vec<u8> = self
            .order
            .iter()
            .map(|&id| self.section(id).map(|section| section.level()).unwrap_or(1))
            .collect();
        let tree = derive(&levels);
        let ids = self.order.clone();
        let to_id = |index: usize| ids[index];

        for (position, derived) in tree.nodes.into_iter().enumerate() {
            let links = Links {
                position,
                depth: derived.depth,
                parent: derived.parent.map(to_id),
                children: derived.children.into_iter().map(to_id).collect(),
            };
            if let Ok(node) = self.node_mut(ids[position]) {
                node.links = links;
            }
        }
        self.roots = tree.roots.into_iter().map(to_id).collect();
        trace!(
            "rebuilt tree: {} sections, {} roots",
            self.order.len(),
            self.roots.len()
        );
    }

    /// Handles in flat order with the depth of each, for callers that render
    /// the outline.
    pub fn depths(&self) -> Vec<(SectionId, usize)> {
        self.order
            .iter()
            .filter_map(|&id| self.depth(id).ok().map(|depth| (id, depth)))
            .collect()
    }
}
