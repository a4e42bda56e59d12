/// Definition lines sharing one part-of-speech header.
///
/// ```text
/// ''rzeczownik, rodzaj męskozwierzęcy''
/// : (1.1) zwierzę domowe
/// : (1.2) samiec kota
/// ```
///
/// is one group with header `rzeczownik, rodzaj męskozwierzęcy` and two
/// lines. Lines keep their `:` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionGroup {
    pub header: String,
    pub lines: Vec<String>,
}

impl DefinitionGroup {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }
}

const DEFINITION_LINE_MARKERS: &[char] = &[':', '*', '#'];

fn is_definition_line(line: &str) -> bool {
    line.starts_with(DEFINITION_LINE_MARKERS)
}

fn strip_italics(line: &str) -> &str {
    line.strip_prefix("''")
        .and_then(|inner| inner.strip_suffix("''"))
        .map(str::trim)
        .unwrap_or(line)
}

/// Group marker-prefixed lines under the nearest preceding header line.
///
/// Lines that appear before any header land in a group with an empty header.
/// Blank lines are dropped.
pub fn parse_groups(content: &str) -> Vec<DefinitionGroup> {
    let mut groups: Vec<DefinitionGroup> = Vec::new();

    for line in content.lines().map(str::trim_end) {
        if line.is_empty() {
            continue;
        }
        if is_definition_line(line) {
            match groups.last_mut() {
                Some(group) => group.lines.push(line.to_string()),
                None => groups.push(DefinitionGroup::new("").with_line(line)),
            }
        } else {
            groups.push(DefinitionGroup::new(strip_italics(line)));
        }
    }

    groups
}

/// Print groups as an italic header line followed by its lines.
pub fn render_groups(groups: &[DefinitionGroup]) -> String {
    let mut lines = Vec::new();
    for group in groups {
        if !group.header.is_empty() {
            lines.push(format!("''{}''", group.header));
        }
        lines.extend(group.lines.iter().cloned());
    }
    lines.join("\n")
}
