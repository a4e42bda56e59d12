use std::fmt;

use crate::document::{TextBlock, text_block::push_newlines};

use super::{
    definitions::{DefinitionGroup, parse_groups, render_groups},
    kind::FieldKind,
};

/// Line starts that put field content on its own line below the marker.
const LINE_START_MARKERS: &[&str] = &[":", "*", "#", "''"];

/// Prefix added to multi-line content that lacks a line-start marker.
const DEFAULT_LINE_MARKER: &str = ": ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Payload {
    Plain,
    Definitions(Vec<DefinitionGroup>),
}

impl Payload {
    fn for_content(kind: FieldKind, content: &str) -> Self {
        match kind {
            FieldKind::Definitions => Payload::Definitions(parse_groups(content)),
            _ => Payload::Plain,
        }
    }
}

/// One marker-introduced field of a dictionary section.
///
/// Printed as the marker, a line break when the content sits on its own
/// line, the content block, and a final line break when one separated this
/// field from whatever followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    kind: FieldKind,
    block: TextBlock,
    own_line: bool,
    line_break: bool,
    payload: Payload,
}

impl Field {
    /// An empty field, terminated by a line break.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            block: TextBlock::default(),
            own_line: false,
            line_break: true,
            payload: Payload::for_content(kind, ""),
        }
    }

    /// Parse the raw text between this field's marker and the next one.
    pub fn parse(kind: FieldKind, raw: &str) -> Self {
        // The break before the next marker is taken first, so a bare "\n"
        // is an empty inline field rather than an empty own-line one.
        let (line_break, rest) = match raw.strip_suffix('\n') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (own_line, rest) = match rest.strip_prefix('\n') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let block = TextBlock::parse(rest);
        let payload = Payload::for_content(kind, &block.text);

        Self {
            kind,
            block,
            own_line,
            line_break,
            payload,
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Content exactly as stored, including any inline separator.
    pub fn content(&self) -> &str {
        &self.block.text
    }

    /// Content without surrounding whitespace.
    pub fn text(&self) -> &str {
        self.block.text.trim()
    }

    pub fn is_own_line(&self) -> bool {
        self.own_line
    }

    pub fn leading_newlines(&self) -> usize {
        self.block.leading_newlines
    }

    pub fn trailing_newlines(&self) -> usize {
        self.block.trailing_newlines
    }

    /// Whether a line break follows the content.
    pub fn has_line_break(&self) -> bool {
        self.line_break
    }

    pub(crate) fn set_line_break(&mut self, line_break: bool) {
        self.line_break = line_break;
    }

    pub fn is_empty(&self) -> bool {
        self.block.text.trim().is_empty()
    }

    /// Definition groups; `None` unless this is the definitions field.
    pub fn definitions(&self) -> Option<&[DefinitionGroup]> {
        match &self.payload {
            Payload::Definitions(groups) => Some(groups),
            Payload::Plain => None,
        }
    }

    /// Replace the content, normalizing it the way editors expect.
    ///
    /// The text is trimmed. Content starting with a line-start marker, or
    /// spanning several lines, goes on its own line; multi-line content
    /// without a marker gets `: ` prepended unless the field manages its own
    /// markup. Single-line content without a marker stays on the marker line
    /// after a space. Blank-line counts are reset.
    pub fn set_content(&mut self, content: &str) {
        let trimmed = content.trim();
        let has_marker = LINE_START_MARKERS.iter().any(|m| trimmed.starts_with(m));
        let multiline = trimmed.contains('\n');

        let (own_line, text) = if trimmed.is_empty() {
            (false, String::new())
        } else if multiline && !has_marker && !self.kind.manages_own_markers() {
            (true, format!("{DEFAULT_LINE_MARKER}{trimmed}"))
        } else if has_marker || multiline {
            (true, trimmed.to_string())
        } else {
            (false, format!(" {trimmed}"))
        };

        self.own_line = own_line;
        self.block = TextBlock::new(text);
        self.payload = Payload::for_content(self.kind, &self.block.text);
    }

    pub(crate) fn set_definitions(&mut self, groups: Vec<DefinitionGroup>) {
        let content = render_groups(&groups);
        self.own_line = !content.is_empty();
        self.block = TextBlock::new(content);
        self.payload = Payload::Definitions(groups);
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        out.push_str(self.kind.marker());
        if self.own_line {
            out.push('\n');
        }
        self.block.write_to(out);
        if self.line_break {
            push_newlines(out, 1);
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}
