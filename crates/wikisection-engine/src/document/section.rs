use std::fmt;
use std::ops::Deref;

use crate::{
    error::{ParseError, StructureError},
    fields::FieldSet,
    parsing::{
        HeaderFormat,
        heading::{MAX_LEVEL, MIN_LEVEL, parse_heading_line},
    },
};

use super::text_block::{TextBlock, push_newlines};

/// One heading and the text under it, up to the next heading.
///
/// A `Section` value is either *attached*, in which case it is owned by a
/// [`Page`](super::Page) and reached through a [`SectionId`](super::SectionId),
/// or *detached*: a standalone value that may carry its own subtree in
/// [`children`](Section::children). Detached sections are what parsing a
/// single chunk, [`Section::new`] and the page's detach operations produce,
/// and what the page's insert operations consume.
///
/// Content attributes (header text, spacing, decoration, body) are public.
/// The level and the subtree only change through level-checked operations.
#[derive(Debug, Clone)]
pub struct Section {
    pub header: String,
    pub format: HeaderFormat,
    pub decoration_before: String,
    pub decoration_after: String,
    /// Text under the heading. For dictionary sections this is only the part
    /// before the first field marker.
    pub body: TextBlock,
    level: u8,
    fields: Option<FieldSet>,
    /// The first marker shared a line with the body text in the source.
    inline_fields: bool,
    children: Vec<Section>,
}

impl Section {
    /// Create an empty section with the default `== header ==` spacing.
    pub fn new(level: u8, header: impl Into<String>) -> Result<Self, StructureError> {
        let level = check_level(level as i16)?;
        Ok(Self {
            header: header.into(),
            format: HeaderFormat::default(),
            decoration_before: String::new(),
            decoration_after: String::new(),
            body: TextBlock::default(),
            level,
            fields: None,
            inline_fields: false,
            children: Vec::new(),
        })
    }

    /// Parse one raw chunk: a heading line followed by the body.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_with(text, false)
    }

    /// Parse one raw chunk and split its body into dictionary fields.
    pub fn parse_entry(text: &str) -> Result<Self, ParseError> {
        Self::parse_with(text, true)
    }

    fn parse_with(text: &str, with_fields: bool) -> Result<Self, ParseError> {
        let (line, rest) = match text.split_once('\n') {
            Some((line, rest)) => (line, Some(rest)),
            None => (text, None),
        };
        let heading = parse_heading_line(line)
            .ok_or_else(|| ParseError::MalformedHeader(line.to_string()))?;

        let mut body = match rest {
            None => TextBlock::default(),
            // The heading's own line break counts as a trailing blank line
            // when nothing else follows.
            Some(rest) if rest.bytes().all(|b| b == b'\n') => TextBlock {
                leading_newlines: 0,
                text: String::new(),
                trailing_newlines: rest.len() + 1,
            },
            Some(rest) => TextBlock::parse(rest),
        };

        let mut inline_fields = false;
        let fields = if with_fields {
            let (intro, fields) = FieldSet::parse(&body.text);
            inline_fields = !fields.is_empty() && !intro.is_empty() && !intro.ends_with('\n');
            body.text = intro;
            Some(fields)
        } else {
            None
        };

        Ok(Self {
            header: heading.header,
            format: heading.format,
            decoration_before: heading.decoration_before,
            decoration_after: heading.decoration_after,
            body,
            level: heading.level,
            fields,
            inline_fields,
            children: Vec::new(),
        })
    }

    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.body = TextBlock::new(intro);
        self.inline_fields = false;
        self
    }

    pub fn with_fields(mut self, fields: FieldSet) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn intro(&self) -> &str {
        &self.body.text
    }

    /// Fields of a dictionary section; `None` for plain sections.
    pub fn fields(&self) -> Option<&FieldSet> {
        self.fields.as_ref()
    }

    pub fn fields_mut(&mut self) -> Option<&mut FieldSet> {
        self.fields.as_mut()
    }

    /// Fields of this section, turning a plain section into a dictionary one
    /// if needed.
    pub fn fields_or_default(&mut self) -> &mut FieldSet {
        self.fields.get_or_insert_with(FieldSet::default)
    }

    /// Owned subtree of a detached section. Always empty while attached.
    pub fn children(&self) -> &[Section] {
        &self.children
    }

    /// Add children after the existing ones. Every child must be deeper.
    pub fn append_children(mut self, children: Vec<Section>) -> Result<Self, StructureError> {
        check_deeper(self.level, &children)?;
        self.children.extend(children);
        Ok(self)
    }

    /// Add children before the existing ones. Every child must be deeper.
    pub fn prepend_children(mut self, children: Vec<Section>) -> Result<Self, StructureError> {
        check_deeper(self.level, &children)?;
        self.children.splice(0..0, children);
        Ok(self)
    }

    /// Shift this section and its whole subtree by `delta` levels.
    pub fn shift_levels(mut self, delta: i8) -> Result<Self, StructureError> {
        check_shift(delta)?;
        self.check_subtree_shift(delta)?;
        self.apply_shift(delta);
        Ok(self)
    }

    fn check_subtree_shift(&self, delta: i8) -> Result<(), StructureError> {
        shift_level(self.level, delta)?;
        self.children
            .iter()
            .try_for_each(|child| child.check_subtree_shift(delta))
    }

    fn apply_shift(&mut self, delta: i8) {
        self.level = (self.level as i16 + delta as i16) as u8;
        for child in &mut self.children {
            child.apply_shift(delta);
        }
    }

    pub(crate) fn set_level(&mut self, level: u8) {
        self.level = level;
    }

    /// Pre-order list of this section and its subtree, children moved out.
    pub(crate) fn flatten(mut self) -> Vec<Section> {
        let children = std::mem::take(&mut self.children);
        let mut out = vec![self];
        for child in children {
            out.extend(child.flatten());
        }
        out
    }

    pub(crate) fn set_children(&mut self, children: Vec<Section>) {
        self.children = children;
    }

    /// Print the heading and body only, without any children.
    pub(crate) fn write_own(&self, out: &mut String) {
        out.push_str(&self.decoration_before);
        self.format.write(out, self.level, &self.header);
        out.push_str(&self.decoration_after);

        let fields = self.fields.as_ref().filter(|fields| !fields.is_empty());
        if self.body.text.is_empty() && fields.is_none() {
            push_newlines(out, self.body.trailing_newlines);
            return;
        }

        out.push('\n');
        push_newlines(out, self.body.leading_newlines);
        out.push_str(&self.body.text);
        if let Some(fields) = fields {
            if !self.inline_fields && !self.body.text.is_empty() && !self.body.text.ends_with('\n')
            {
                out.push('\n');
            }
            fields.write_to(out);
        }
        push_newlines(out, self.body.trailing_newlines);
    }

    fn write_tree(&self, out: &mut String) {
        self.write_own(out);
        for child in &self.children {
            out.push('\n');
            child.write_tree(out);
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_tree(&mut out);
        f.write_str(&out)
    }
}

/// Content-only access to a section attached to a page.
///
/// Derefs to [`Section`] for reading. There is no `DerefMut`, so the level,
/// the owned subtree and the section as a whole cannot be replaced through
/// it.
#[derive(Debug)]
pub struct SectionMut<'a> {
    section: &'a mut Section,
}

impl<'a> SectionMut<'a> {
    pub(crate) fn new(section: &'a mut Section) -> Self {
        Self { section }
    }

    pub fn header_mut(&mut self) -> &mut String {
        &mut self.section.header
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.section.header = header.into();
    }

    pub fn format_mut(&mut self) -> &mut HeaderFormat {
        &mut self.section.format
    }

    pub fn decoration_before_mut(&mut self) -> &mut String {
        &mut self.section.decoration_before
    }

    pub fn decoration_after_mut(&mut self) -> &mut String {
        &mut self.section.decoration_after
    }

    pub fn body_mut(&mut self) -> &mut TextBlock {
        &mut self.section.body
    }

    pub fn fields_mut(&mut self) -> Option<&mut FieldSet> {
        self.section.fields.as_mut()
    }

    pub fn fields_or_default(&mut self) -> &mut FieldSet {
        self.section.fields_or_default()
    }
}

impl Deref for SectionMut<'_> {
    type Target = Section;

    fn deref(&self) -> &Section {
        &*self.section
    }
}

pub(crate) fn check_level(level: i16) -> Result<u8, StructureError> {
    if (MIN_LEVEL as i16..=MAX_LEVEL as i16).contains(&level) {
        Ok(level as u8)
    } else {
        Err(StructureError::LevelOutOfRange(level))
    }
}

pub(crate) fn check_shift(delta: i8) -> Result<(), StructureError> {
    if (1..=5).contains(&delta.unsigned_abs()) {
        Ok(())
    } else {
        Err(StructureError::InvalidShift(delta))
    }
}

pub(crate) fn shift_level(level: u8, delta: i8) -> Result<u8, StructureError> {
    check_level(level as i16 + delta as i16)
}

pub(crate) fn check_deeper(parent: u8, children: &[Section]) -> Result<(), StructureError> {
    match children.iter().find(|child| child.level <= parent) {
        Some(child) => Err(StructureError::NotDeeper {
            parent,
            child: child.level,
        }),
        None => Ok(()),
    }
}

pub(crate) fn check_same_level(expected: u8, sections: &[Section]) -> Result<(), StructureError> {
    match sections.iter().find(|section| section.level != expected) {
        Some(section) => Err(StructureError::LevelMismatch {
            expected,
            found: section.level,
        }),
        None => Ok(()),
    }
}
