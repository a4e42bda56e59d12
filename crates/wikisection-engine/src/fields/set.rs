use std::collections::BTreeMap;
use std::fmt;

use log::trace;

use crate::parsing::IgnoredRanges;

use super::{definitions::DefinitionGroup, field::Field, kind::FieldKind};

/// The fields of one dictionary section.
///
/// Uses BTreeMap keyed by kind, so iteration and printing always follow the
/// vocabulary order regardless of where a marker appeared in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: BTreeMap<FieldKind, Field>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a section body into the text before the first marker and the
    /// fields that follow.
    ///
    /// Only the first occurrence of each marker outside comments and verbatim
    /// blocks counts; a repeated marker stays inside the content of the field
    /// before it.
    pub fn parse(body: &str) -> (String, Self) {
        let ignored = IgnoredRanges::for_wikitext(body);

        let mut found: Vec<(usize, FieldKind)> = FieldKind::ALL
            .into_iter()
            .filter_map(|kind| find_marker(body, kind.marker(), &ignored).map(|pos| (pos, kind)))
            .collect();
        found.sort_by_key(|(pos, _)| *pos);

        let intro_end = found.first().map(|(pos, _)| *pos).unwrap_or(body.len());
        let mut fields = BTreeMap::new();
        for (i, (pos, kind)) in found.iter().enumerate() {
            let start = pos + kind.marker().len();
            let end = found.get(i + 1).map(|(next, _)| *next).unwrap_or(body.len());
            trace!("field {kind:?} at {pos}..{end}");
            fields.insert(*kind, Field::parse(*kind, &body[start..end]));
        }

        let reordered = found.windows(2).any(|pair| pair[0].1 > pair[1].1);
        if reordered && let Some((_, source_last)) = found.last() {
            relink_line_breaks(&mut fields, *source_last);
        }

        (body[..intro_end].to_string(), Self { fields })
    }

    pub fn get(&self, kind: FieldKind) -> Option<&Field> {
        self.fields.get(&kind)
    }

    pub fn get_mut(&mut self, kind: FieldKind) -> Option<&mut Field> {
        self.fields.get_mut(&kind)
    }

    pub fn contains(&self, kind: FieldKind) -> bool {
        self.fields.contains_key(&kind)
    }

    /// Set the content of `kind`, creating the field in its vocabulary slot
    /// if it is missing.
    pub fn insert(&mut self, kind: FieldKind, content: &str) -> &mut Field {
        if !self.fields.contains_key(&kind) {
            self.insert_empty(kind);
        }
        let field = self
            .fields
            .entry(kind)
            .or_insert_with(|| Field::new(kind));
        field.set_content(content);
        field
    }

    /// Replace the definitions field with `groups`, creating it if missing.
    pub fn set_definitions(&mut self, groups: Vec<DefinitionGroup>) -> &mut Field {
        if !self.fields.contains_key(&FieldKind::Definitions) {
            self.insert_empty(FieldKind::Definitions);
        }
        let field = self
            .fields
            .entry(FieldKind::Definitions)
            .or_insert_with(|| Field::new(FieldKind::Definitions));
        field.set_definitions(groups);
        field
    }

    /// New fields end with a line break unless they become the last field,
    /// in which case the previous last field takes over that break.
    fn insert_empty(&mut self, kind: FieldKind) {
        let mut field = Field::new(kind);
        let has_next = self.fields.range(kind..).next().is_some();
        if !has_next {
            if let Some((_, previous)) = self.fields.range_mut(..kind).next_back() {
                field.set_line_break(previous.has_line_break());
                previous.set_line_break(true);
            } else {
                field.set_line_break(false);
            }
        }
        self.fields.insert(kind, field);
    }

    pub fn remove(&mut self, kind: FieldKind) -> Option<Field> {
        let removed = self.fields.remove(&kind)?;
        let was_last = self.fields.range(kind..).next().is_none();
        if was_last && let Some((_, previous)) = self.fields.range_mut(..kind).next_back() {
            previous.set_line_break(removed.has_line_break());
        }
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn kinds(&self) -> impl Iterator<Item = FieldKind> + '_ {
        self.fields.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        for field in self.fields.values() {
            field.write_to(out);
        }
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

/// After reordering, every field but the last is followed by another marker
/// and needs a break; the last one ends the way the source body ended.
fn relink_line_breaks(fields: &mut BTreeMap<FieldKind, Field>, source_last: FieldKind) {
    let end_break = fields
        .get(&source_last)
        .is_some_and(Field::has_line_break);
    let count = fields.len();
    for (i, field) in fields.values_mut().enumerate() {
        field.set_line_break(i + 1 < count || end_break);
    }
}

fn find_marker(body: &str, marker: &str, ignored: &IgnoredRanges) -> Option<usize> {
    body.match_indices(marker)
        .map(|(pos, _)| pos)
        .find(|pos| !ignored.contains(*pos))
}
