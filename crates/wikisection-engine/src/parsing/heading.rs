use std::sync::OnceLock;

use regex::Regex;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 6;

/// Spacing between the equals runs and the header text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HeaderFormat {
    /// `== Header ==`
    #[default]
    Spaced,
    /// `==Header==`
    Compact,
    /// Any other padding, kept verbatim.
    Custom { before: String, after: String },
}

impl HeaderFormat {
    /// Classify the padding captured around a header.
    pub fn from_padding(before: &str, after: &str) -> Self {
        match (before, after) {
            (" ", " ") => HeaderFormat::Spaced,
            ("", "") => HeaderFormat::Compact,
            _ => HeaderFormat::Custom {
                before: before.to_string(),
                after: after.to_string(),
            },
        }
    }

    /// Padding written before and after the header text.
    pub fn padding(&self) -> (&str, &str) {
        match self {
            HeaderFormat::Spaced => (" ", " "),
            HeaderFormat::Compact => ("", ""),
            HeaderFormat::Custom { before, after } => (before, after),
        }
    }

    /// Write a full heading line for `level` and `header`.
    pub fn write(&self, out: &mut String, level: u8, header: &str) {
        let equals = "=".repeat(level as usize);
        let (before, after) = self.padding();
        out.push_str(&equals);
        out.push_str(before);
        out.push_str(header);
        out.push_str(after);
        out.push_str(&equals);
    }
}

/// A recognized heading line, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingLine {
    pub level: u8,
    pub header: String,
    pub format: HeaderFormat,
    /// Comments (and spacing) in front of the opening equals run.
    pub decoration_before: String,
    /// Comments and trailing whitespace after the closing equals run.
    pub decoration_after: String,
}

impl HeadingLine {
    /// Byte offset of the opening equals run within the line.
    pub fn equals_offset(&self) -> usize {
        self.decoration_before.len()
    }
}

fn level_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        (MIN_LEVEL..=MAX_LEVEL)
            .map(|level| {
                let pattern = format!(
                    r"^(?P<before>(?:<!--.*?-->[ \t]*)*)={{{level}}}(?P<text>.+?)={{{level}}}(?P<after>(?:\s*<!--.*?-->)*\s*)$"
                );
                Regex::new(&pattern).expect("Invalid heading regex")
            })
            .collect()
    })
}

/// Match a single line (without its line break) against the heading
/// patterns, widest equals run first.
///
/// Trying level 6 down to level 1 means `==a=b==` is a level 2 heading with
/// the text `a=b`, and unbalanced runs such as `===a==` fall back to the
/// narrower level.
pub fn parse_heading_line(line: &str) -> Option<HeadingLine> {
    let patterns = level_patterns();
    (MIN_LEVEL..=MAX_LEVEL).rev().find_map(|level| {
        let caps = patterns[(level - MIN_LEVEL) as usize].captures(line)?;
        let raw = caps.name("text")?.as_str();
        let trimmed = raw.trim();
        let (before, after) = if trimmed.is_empty() {
            (raw, "")
        } else {
            let before_len = raw.len() - raw.trim_start().len();
            (&raw[..before_len], &raw[raw.trim_end().len()..])
        };

        Some(HeadingLine {
            level,
            header: trimmed.to_string(),
            format: HeaderFormat::from_padding(before, after),
            decoration_before: caps.name("before")?.as_str().to_string(),
            decoration_after: caps.name("after")?.as_str().to_string(),
        })
    })
}
