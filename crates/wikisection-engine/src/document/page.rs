use std::fmt;

use log::debug;

use crate::{
    error::{NavigationError, ParseError},
    parsing::{IgnoredRanges, split_sections},
};

use super::{
    section::{Section, SectionMut},
    text_block::TextBlock,
};

/// Stable handle to a section attached to a [`Page`].
///
/// Handles compare by identity: two sections with the same header are still
/// different sections. Once a section is detached its handle goes stale and
/// every lookup with it fails, even if the arena slot is later reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId {
    index: u32,
    generation: u32,
}

/// Derived position of a section in the tree. Rewritten by the tree builder.
#[derive(Debug, Clone, Default)]
pub(crate) struct Links {
    pub(crate) position: usize,
    pub(crate) depth: usize,
    pub(crate) parent: Option<SectionId>,
    pub(crate) children: Vec<SectionId>,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) section: Section,
    pub(crate) links: Links,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A parsed wiki page: an intro and a flat sequence of sections.
///
/// The page owns every attached section. `order` is the only structural
/// state that is stored; `roots` and each node's [`Links`] are derived from
/// it and the section levels by the tree builder.
#[derive(Debug, Clone)]
pub struct Page {
    title: String,
    intro: TextBlock,
    slots: Vec<Slot>,
    free: Vec<u32>,
    pub(crate) order: Vec<SectionId>,
    pub(crate) roots: Vec<SectionId>,
}

impl Page {
    /// An empty page with no intro and no sections.
    pub fn create(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            intro: TextBlock::default(),
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Parse wikitext into plain sections.
    pub fn parse(title: impl Into<String>, text: &str) -> Result<Self, ParseError> {
        Self::parse_with(title.into(), text, false)
    }

    /// Parse wikitext as a dictionary page, splitting every section body
    /// into fields.
    pub fn parse_entry(title: impl Into<String>, text: &str) -> Result<Self, ParseError> {
        Self::parse_with(title.into(), text, true)
    }

    fn parse_with(title: String, text: &str, with_fields: bool) -> Result<Self, ParseError> {
        let ignored = IgnoredRanges::for_wikitext(text);
        let split = split_sections(text, &ignored);

        let mut page = Self::create(title);
        page.intro = TextBlock::parse(split.intro);

        let count = split.chunks.len();
        for (i, chunk) in split.chunks.into_iter().enumerate() {
            // The break before the next heading belongs to the join, not to
            // this section.
            let raw = if i + 1 < count {
                chunk.strip_suffix('\n').unwrap_or(chunk)
            } else {
                chunk
            };
            let section = if with_fields {
                Section::parse_entry(raw)?
            } else {
                Section::parse(raw)?
            };
            let id = page.alloc(section);
            page.order.push(id);
        }

        page.rebuild_tree();
        debug!(
            "parsed page {:?}: {} sections, {} ignored ranges",
            page.title,
            page.order.len(),
            ignored.ranges().len()
        );
        Ok(page)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn intro(&self) -> &TextBlock {
        &self.intro
    }

    pub fn set_intro(&mut self, intro: impl Into<String>) {
        self.intro = TextBlock::new(intro);
    }

    pub fn intro_mut(&mut self) -> &mut TextBlock {
        &mut self.intro
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `id` currently points at a section of this page.
    pub fn contains(&self, id: SectionId) -> bool {
        self.node(id).is_ok()
    }

    pub fn section(&self, id: SectionId) -> Result<&Section, NavigationError> {
        self.node(id).map(|node| &node.section)
    }

    /// Edit a section's content in place.
    ///
    /// The view reads like a [`Section`] but only hands out the header,
    /// spacing, decoration, body and fields. Level and subtree changes go
    /// through the page's mutation methods.
    pub fn section_mut(&mut self, id: SectionId) -> Result<SectionMut<'_>, NavigationError> {
        self.node_mut(id).map(|node| SectionMut::new(&mut node.section))
    }

    /// All sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = (SectionId, &Section)> {
        self.order
            .iter()
            .filter_map(|&id| self.section(id).ok().map(|section| (id, section)))
    }

    /// Handles of all sections in document order.
    pub fn section_ids(&self) -> &[SectionId] {
        &self.order
    }

    /// Sections at depth 1.
    pub fn root_sections(&self) -> &[SectionId] {
        &self.roots
    }

    pub fn find_sections<F>(&self, mut predicate: F) -> Vec<SectionId>
    where
        F: FnMut(&Section) -> bool,
    {
        self.sections()
            .filter(|(_, section)| predicate(section))
            .map(|(id, _)| id)
            .collect()
    }

    /// Sections whose header text equals `header` exactly.
    pub fn find_by_header(&self, header: &str) -> Vec<SectionId> {
        self.find_sections(|section| section.header == header)
    }

    // Navigation

    pub fn parent(&self, id: SectionId) -> Result<Option<SectionId>, NavigationError> {
        self.node(id).map(|node| node.links.parent)
    }

    pub fn children(&self, id: SectionId) -> Result<&[SectionId], NavigationError> {
        self.node(id).map(|node| node.links.children.as_slice())
    }

    /// Sections sharing this section's parent, itself included.
    pub fn siblings(&self, id: SectionId) -> Result<&[SectionId], NavigationError> {
        match self.parent(id)? {
            Some(parent) => self.children(parent),
            None => Ok(&self.roots),
        }
    }

    /// Nesting depth, 1 for root sections.
    pub fn depth(&self, id: SectionId) -> Result<usize, NavigationError> {
        self.node(id).map(|node| node.links.depth)
    }

    /// Index of the section in the flat document order.
    pub fn position(&self, id: SectionId) -> Result<usize, NavigationError> {
        self.node(id).map(|node| node.links.position)
    }

    pub fn next_section(&self, id: SectionId) -> Result<Option<SectionId>, NavigationError> {
        let position = self.position(id)?;
        Ok(self.order.get(position + 1).copied())
    }

    pub fn previous_section(&self, id: SectionId) -> Result<Option<SectionId>, NavigationError> {
        let position = self.position(id)?;
        Ok(position
            .checked_sub(1)
            .and_then(|prev| self.order.get(prev).copied()))
    }

    pub fn next_sibling(&self, id: SectionId) -> Result<Option<SectionId>, NavigationError> {
        let siblings = self.siblings(id)?;
        let index = sibling_index(siblings, id)?;
        Ok(siblings.get(index + 1).copied())
    }

    pub fn previous_sibling(&self, id: SectionId) -> Result<Option<SectionId>, NavigationError> {
        let siblings = self.siblings(id)?;
        let index = sibling_index(siblings, id)?;
        Ok(index.checked_sub(1).map(|prev| siblings[prev]))
    }

    /// Flat-order range covering the section and all its descendants.
    pub fn subtree_range(&self, id: SectionId) -> Result<std::ops::Range<usize>, NavigationError> {
        let start = self.position(id)?;
        let mut last = id;
        while let Some(&child) = self.children(last)?.last() {
            last = child;
        }
        Ok(start..self.position(last)? + 1)
    }

    /// Print one section together with all of its descendants.
    pub fn subtree_text(&self, id: SectionId) -> Result<String, NavigationError> {
        let range = self.subtree_range(id)?;
        let mut out = String::new();
        self.write_sections(&self.order[range], &mut out);
        Ok(out)
    }

    // Arena

    pub(crate) fn node(&self, id: SectionId) -> Result<&Node, NavigationError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(NavigationError::Detached)
    }

    pub(crate) fn node_mut(&mut self, id: SectionId) -> Result<&mut Node, NavigationError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(NavigationError::Detached)
    }

    /// Store a section in the arena. The caller places the handle in `order`.
    pub(crate) fn alloc(&mut self, section: Section) -> SectionId {
        let node = Node {
            section,
            links: Links::default(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                SectionId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                SectionId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Take a section out of the arena, invalidating its handle.
    pub(crate) fn release(&mut self, id: SectionId) -> Option<Node> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    fn write_sections(&self, ids: &[SectionId], out: &mut String) {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if let Ok(section) = self.section(*id) {
                section.write_own(out);
            }
        }
    }
}

fn sibling_index(siblings: &[SectionId], id: SectionId) -> Result<usize, NavigationError> {
    siblings
        .iter()
        .position(|&sibling| sibling == id)
        .ok_or(NavigationError::Detached)
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.intro.write_to(&mut out);
        if !self.order.is_empty() && !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        self.write_sections(&self.order, &mut out);
        f.write_str(&out)
    }
}
