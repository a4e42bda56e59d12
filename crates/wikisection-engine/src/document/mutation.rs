//! Structural edits on a [`Page`].
//!
//! Every operation validates all of its preconditions first and only then
//! touches the flat order, finishing with a tree rebuild. A returned error
//! therefore always means the page was left unchanged.

use std::cmp::Ordering;

use log::debug;

use crate::{
    error::{NavigationError, StructureError},
    fields::FieldSet,
};

use super::{
    page::{Page, SectionId},
    section::{Section, check_deeper, check_same_level, check_shift, shift_level},
    tree::derive,
};

impl Page {
    /// Add `children` after the last descendant of `id`.
    ///
    /// Every new section must be deeper than `id`. Returns the handles of
    /// the given sections; their own subtrees are attached too.
    pub fn append_children(
        &mut self,
        id: SectionId,
        children: Vec<Section>,
    ) -> Result<Vec<SectionId>, StructureError> {
        check_deeper(self.section(id)?.level(), &children)?;
        let at = self.subtree_range(id)?.end;
        Ok(self.splice(at, children))
    }

    /// Add `children` directly after `id`, before its existing children.
    pub fn prepend_children(
        &mut self,
        id: SectionId,
        children: Vec<Section>,
    ) -> Result<Vec<SectionId>, StructureError> {
        check_deeper(self.section(id)?.level(), &children)?;
        let at = self.position(id)? + 1;
        Ok(self.splice(at, children))
    }

    /// Insert same-level sections right before `id`.
    pub fn insert_before(
        &mut self,
        id: SectionId,
        sections: Vec<Section>,
    ) -> Result<Vec<SectionId>, StructureError> {
        check_same_level(self.section(id)?.level(), &sections)?;
        let at = self.position(id)?;
        Ok(self.splice(at, sections))
    }

    /// Insert same-level sections right after the subtree of `id`.
    pub fn insert_after(
        &mut self,
        id: SectionId,
        sections: Vec<Section>,
    ) -> Result<Vec<SectionId>, StructureError> {
        check_same_level(self.section(id)?.level(), &sections)?;
        let at = self.subtree_range(id)?.end;
        Ok(self.splice(at, sections))
    }

    /// Add sections at the end of the page, whatever their level.
    pub fn push_sections(&mut self, sections: Vec<Section>) -> Vec<SectionId> {
        let at = self.order.len();
        self.splice(at, sections)
    }

    /// Remove `id` and its whole subtree from the page.
    ///
    /// The returned section owns the removed descendants as its children.
    /// Every removed handle goes stale.
    pub fn detach(&mut self, id: SectionId) -> Result<Section, StructureError> {
        let range = self.subtree_range(id)?;
        let removed: Vec<SectionId> = self.order.drain(range).collect();
        let sections: Vec<Section> = removed
            .into_iter()
            .filter_map(|id| self.release(id))
            .map(|node| node.section)
            .collect();
        self.rebuild_tree();
        debug!("detached {} sections from {:?}", sections.len(), self.title());

        nest(sections)
            .into_iter()
            .next()
            .ok_or(StructureError::Detached)
    }

    /// Remove only `id`, leaving its descendants in the flat order.
    ///
    /// The former children are re-derived against whatever now precedes
    /// them.
    pub fn detach_only_self(&mut self, id: SectionId) -> Result<Section, StructureError> {
        let position = self.position(id)?;
        self.order.remove(position);
        let node = self.release(id).ok_or(StructureError::Detached)?;
        self.rebuild_tree();
        Ok(node.section)
    }

    /// Put `other` (with its own subtree) where `id` is.
    ///
    /// `other` must have the same level. The children of `id` stay in the
    /// page and end up under `other`. Returns the new handle and the removed
    /// section.
    pub fn replace_with(
        &mut self,
        id: SectionId,
        other: Section,
    ) -> Result<(SectionId, Section), StructureError> {
        let old = self.section(id)?;
        check_same_level(old.level(), std::slice::from_ref(&other))?;
        let position = self.position(id)?;

        self.order.remove(position);
        let node = self.release(id).ok_or(StructureError::Detached)?;
        let ids = self.splice(position, vec![other]);
        let new_id = ids.into_iter().next().ok_or(StructureError::Detached)?;
        Ok((new_id, node.section))
    }

    /// Shift `id` and its whole subtree by `delta` levels.
    ///
    /// Fails without changes when `delta` is 0, beyond ±5, or would move any
    /// level of the subtree out of 1..=6.
    pub fn push_levels(&mut self, id: SectionId, delta: i8) -> Result<(), StructureError> {
        check_shift(delta)?;
        let range = self.subtree_range(id)?;
        let targets: Vec<SectionId> = self.order[range].to_vec();

        let mut shifted = Vec::with_capacity(targets.len());
        for &target in &targets {
            shifted.push(shift_level(self.section(target)?.level(), delta)?);
        }
        for (target, level) in targets.into_iter().zip(shifted) {
            self.node_mut(target)?.section.set_level(level);
        }

        self.rebuild_tree();
        Ok(())
    }

    /// Reorder the whole flat sequence with `compare` and re-derive the tree.
    ///
    /// The sort is stable, so a comparator that considers everything equal
    /// leaves the page untouched.
    pub fn sort_sections<F>(&mut self, mut compare: F)
    where
        F: FnMut(&Section, &Section) -> Ordering,
    {
        let mut order = self.order.clone();
        order.sort_by(|a, b| match (self.section(*a), self.section(*b)) {
            (Ok(a), Ok(b)) => compare(a, b),
            _ => Ordering::Equal,
        });
        self.order = order;
        self.rebuild_tree();
    }

    /// Rewrite every level so children sit exactly one level below their
    /// parent. Roots all take the lowest root level.
    pub fn normalize_levels(&mut self) {
        let Some(base) = self
            .roots
            .iter()
            .filter_map(|&root| self.section(root).ok())
            .map(Section::level)
            .min()
        else {
            return;
        };
        let roots = self.roots.clone();
        for root in roots {
            self.relevel_subtree(root, base);
        }
        self.rebuild_tree();
    }

    /// Like [`Page::normalize_levels`], for the descendants of `id` only.
    pub fn normalize_child_levels(&mut self, id: SectionId) -> Result<(), StructureError> {
        let level = self.section(id)?.level();
        let children = self.children(id)?.to_vec();
        for child in children {
            self.relevel_subtree(child, level + 1);
        }
        self.rebuild_tree();
        Ok(())
    }

    /// Dictionary fields of `id`; `None` for plain sections.
    pub fn fields(&self, id: SectionId) -> Result<Option<&FieldSet>, NavigationError> {
        Ok(self.section(id)?.fields())
    }

    pub fn fields_mut(
        &mut self,
        id: SectionId,
    ) -> Result<Option<&mut FieldSet>, NavigationError> {
        Ok(self.node_mut(id)?.section.fields_mut())
    }

    // Stays within 6: child levels strictly increase, so no chain below
    // `level` is longer than 6 - level.
    fn relevel_subtree(&mut self, id: SectionId, level: u8) {
        if let Ok(node) = self.node_mut(id) {
            node.section.set_level(level);
        }
        let children = self.children(id).map(<[_]>::to_vec).unwrap_or_default();
        for child in children {
            self.relevel_subtree(child, level + 1);
        }
    }

    /// Flatten `sections` into the arena at flat position `at`.
    ///
    /// Returns the handles of the top-level sections only.
    fn splice(&mut self, at: usize, sections: Vec<Section>) -> Vec<SectionId> {
        let mut top = Vec::with_capacity(sections.len());
        let mut ids = Vec::new();
        for section in sections {
            for (n, flat) in section.flatten().into_iter().enumerate() {
                let id = self.alloc(flat);
                if n == 0 {
                    top.push(id);
                }
                ids.push(id);
            }
        }
        let count = ids.len();
        self.order.splice(at..at, ids);
        self.rebuild_tree();
        debug!("spliced {count} sections at {at} into {:?}", self.title());
        top
    }
}

/// Rebuild owned subtrees from a flat pre-order run of sections.
fn nest(sections: Vec<Section>) -> Vec<Section> {
    let levels: Vec<u8> = sections.iter().map(Section::level).collect();
    let tree = derive(&levels);
    let mut slots: Vec<Option<Section>> = sections.into_iter().map(Some).collect();

    // Children always come after their parent, so walking backwards finishes
    // every subtree before its parent claims it.
    for i in (0..slots.len()).rev() {
        let children: Vec<Section> = tree.nodes[i]
            .children
            .iter()
            .filter_map(|&child| slots[child].take())
            .collect();
        if let Some(section) = slots[i].as_mut() {
            section.set_children(children);
        }
    }

    tree.roots
        .iter()
        .filter_map(|&root| slots[root].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCENARIO: &str = "==A==\nfoo\n===B===\nbar\n==C==\nbaz";

    fn page() -> Page {
        Page::parse("t", SCENARIO).unwrap()
    }

    fn id(page: &Page, header: &str) -> SectionId {
        page.find_by_header(header)[0]
    }

    #[test]
    fn test_append_child_to_last_root() {
        let mut page = page();
        let c = id(&page, "C");
        let new = Section::new(3, "D").unwrap().with_intro("qux");
        let ids = page.append_children(c, vec![new]).unwrap();

        assert_eq!(page.to_string(), format!("{SCENARIO}\n=== D ===\nqux"));
        assert_eq!(page.parent(ids[0]).unwrap(), Some(c));
        assert_eq!(page.depth(ids[0]).unwrap(), 2);
    }

    #[test]
    fn test_append_child_goes_after_descendants() {
        let mut page = page();
        let a = id(&page, "A");
        page.append_children(a, vec![Section::new(3, "X").unwrap()])
            .unwrap();
        assert_eq!(
            page.to_string(),
            "==A==\nfoo\n===B===\nbar\n=== X ===\n==C==\nbaz"
        );
        assert_eq!(page.children(a).unwrap().len(), 2);
    }

    #[test]
    fn test_append_nothing_is_a_no_op() {
        let mut page = page();
        let a = id(&page, "A");
        assert!(page.append_children(a, vec![]).unwrap().is_empty());
        assert_eq!(page.to_string(), SCENARIO);
    }

    #[test]
    fn test_append_rejects_shallow_child() {
        let mut page = page();
        let b = id(&page, "B");
        let err = page
            .append_children(b, vec![Section::new(2, "X").unwrap()])
            .unwrap_err();
        assert_eq!(err, StructureError::NotDeeper { parent: 3, child: 2 });
        assert_eq!(page.to_string(), SCENARIO);
    }

    #[test]
    fn test_append_carries_subtree() {
        let mut page = page();
        let c = id(&page, "C");
        let child = Section::new(3, "D")
            .unwrap()
            .append_children(vec![Section::new(4, "E").unwrap()])
            .unwrap();
        let ids = page.append_children(c, vec![child]).unwrap();

        assert_eq!(ids.len(), 1);
        assert_eq!(page.len(), 5);
        let e = id(&page, "E");
        assert_eq!(page.parent(e).unwrap(), Some(ids[0]));
    }

    #[test]
    fn test_prepend_child() {
        let mut page = page();
        let a = id(&page, "A");
        page.prepend_children(a, vec![Section::new(3, "X").unwrap()])
            .unwrap();
        assert_eq!(
            page.to_string(),
            "==A==\nfoo\n=== X ===\n===B===\nbar\n==C==\nbaz"
        );
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut page = page();
        let a = id(&page, "A");
        page.insert_after(a, vec![Section::new(2, "After").unwrap()])
            .unwrap();
        page.insert_before(a, vec![Section::new(2, "Before").unwrap()])
            .unwrap();

        let roots: Vec<_> = page
            .root_sections()
            .iter()
            .map(|&id| page.section(id).unwrap().header.clone())
            .collect();
        assert_eq!(roots, vec!["Before", "A", "After", "C"]);
        assert_eq!(
            page.to_string(),
            "== Before ==\n==A==\nfoo\n===B===\nbar\n== After ==\n==C==\nbaz"
        );
    }

    #[test]
    fn test_insert_rejects_other_level() {
        let mut page = page();
        let b = id(&page, "B");
        let err = page
            .insert_after(b, vec![Section::new(2, "X").unwrap()])
            .unwrap_err();
        assert_eq!(err, StructureError::LevelMismatch { expected: 3, found: 2 });
    }

    #[test]
    fn test_detach_takes_subtree() {
        let mut page = page();
        let a = id(&page, "A");
        let b = id(&page, "B");
        let detached = page.detach(a).unwrap();

        assert_eq!(detached.to_string(), "==A==\nfoo\n===B===\nbar");
        assert_eq!(detached.children().len(), 1);
        assert_eq!(page.to_string(), "==C==\nbaz");
        assert_eq!(page.section(a).unwrap_err(), NavigationError::Detached);
        assert_eq!(page.section(b).unwrap_err(), NavigationError::Detached);
    }

    #[test]
    fn test_detached_handle_is_rejected_after_slot_reuse() {
        let mut page = page();
        let b = id(&page, "B");
        page.detach(b).unwrap();
        let a = id(&page, "A");
        let new = page
            .append_children(a, vec![Section::new(3, "B2").unwrap()])
            .unwrap();

        assert_ne!(new[0], b);
        assert!(!page.contains(b));
        assert_eq!(
            page.next_sibling(b).unwrap_err(),
            NavigationError::Detached
        );
    }

    #[test]
    fn test_reattach_detached_subtree() {
        let mut page = page();
        let a = id(&page, "A");
        let detached = page.detach(a).unwrap();
        page.push_sections(vec![detached]);
        assert_eq!(page.to_string(), "==C==\nbaz\n==A==\nfoo\n===B===\nbar");
    }

    #[test]
    fn test_detach_only_self_keeps_children() {
        let mut page = page();
        let a = id(&page, "A");
        let removed = page.detach_only_self(a).unwrap();

        assert!(removed.children().is_empty());
        assert_eq!(page.to_string(), "===B===\nbar\n==C==\nbaz");
        let b = id(&page, "B");
        assert_eq!(page.parent(b).unwrap(), None);
    }

    #[test]
    fn test_replace_with_keeps_children_in_place() {
        let mut page = page();
        let a = id(&page, "A");
        let (new, old) = page
            .replace_with(a, Section::new(2, "Z").unwrap().with_intro("zzz"))
            .unwrap();

        assert_eq!(old.header, "A");
        assert_eq!(page.to_string(), "== Z ==\nzzz\n===B===\nbar\n==C==\nbaz");
        assert_eq!(page.children(new).unwrap().len(), 1);
    }

    #[test]
    fn test_replace_with_rejects_other_level() {
        let mut page = page();
        let a = id(&page, "A");
        let err = page
            .replace_with(a, Section::new(3, "Z").unwrap())
            .unwrap_err();
        assert_eq!(err, StructureError::LevelMismatch { expected: 2, found: 3 });
        assert_eq!(page.to_string(), SCENARIO);
    }

    #[test]
    fn test_push_levels_moves_subtree() {
        let mut page = page();
        let a = id(&page, "A");
        page.push_levels(a, 1).unwrap();
        assert_eq!(page.to_string(), "===A===\nfoo\n====B====\nbar\n==C==\nbaz");
    }

    #[test]
    fn test_push_levels_out_of_range_leaves_page_unchanged() {
        let text = "====A====\n=====B=====\ntext";
        let mut page = Page::parse("t", text).unwrap();
        let a = id(&page, "A");
        let err = page.push_levels(a, 2).unwrap_err();

        assert_eq!(err, StructureError::LevelOutOfRange(7));
        assert_eq!(page.to_string(), text);
        assert_eq!(page.section(a).unwrap().level(), 4);
    }

    #[test]
    fn test_push_levels_rejects_zero() {
        let mut page = page();
        let a = id(&page, "A");
        assert_eq!(
            page.push_levels(a, 0).unwrap_err(),
            StructureError::InvalidShift(0)
        );
    }

    #[test]
    fn test_identity_sort_is_a_no_op() {
        let mut page = page();
        page.sort_sections(|_, _| Ordering::Equal);
        assert_eq!(page.to_string(), SCENARIO);
    }

    #[test]
    fn test_sort_by_header_rederives_tree() {
        let mut page = Page::parse("t", "==B==\n==A==\n===C===").unwrap();
        page.sort_sections(|a, b| a.header.cmp(&b.header));
        assert_eq!(page.to_string(), "==A==\n==B==\n===C===");
        let b = id(&page, "B");
        assert_eq!(page.children(b).unwrap().len(), 1);
    }

    #[test]
    fn test_normalize_levels_closes_gaps() {
        let mut page = Page::parse("t", "==A==\n=====B=====\n====C====\n==D==").unwrap();
        page.normalize_levels();
        assert_eq!(page.to_string(), "==A==\n===B===\n===C===\n==D==");
    }

    #[test]
    fn test_normalize_child_levels() {
        let mut page = Page::parse("t", "==A==\n====B====\n==C==\n=====D=====").unwrap();
        let a = id(&page, "A");
        page.normalize_child_levels(a).unwrap();
        assert_eq!(page.to_string(), "==A==\n===B===\n==C==\n=====D=====");
    }

    #[test]
    fn test_edit_fields_through_page() {
        let text = "== kot ==\n{{znaczenia}}\n: (1.1) zwierzę";
        let mut page = Page::parse_entry("kot", text).unwrap();
        let kot = id(&page, "kot");
        page.fields_mut(kot)
            .unwrap()
            .unwrap()
            .insert(crate::FieldKind::Notes, "pospolity");
        assert_eq!(
            page.to_string(),
            "== kot ==\n{{znaczenia}}\n: (1.1) zwierzę\n{{uwagi}} pospolity"
        );
    }
}
