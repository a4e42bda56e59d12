use std::fmt;

/// A run of text with its surrounding blank lines counted separately.
///
/// `leading_newlines` and `trailing_newlines` count bare `\n` characters, so
/// printing a parsed block gives back exactly what was parsed. Text that
/// consists only of line breaks is stored as an empty `text` with every
/// break counted as trailing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlock {
    pub leading_newlines: usize,
    pub text: String,
    pub trailing_newlines: usize,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            leading_newlines: 0,
            text: text.into(),
            trailing_newlines: 0,
        }
    }

    pub fn parse(raw: &str) -> Self {
        let rest = raw.trim_start_matches('\n');
        if rest.is_empty() {
            return Self {
                leading_newlines: 0,
                text: String::new(),
                trailing_newlines: raw.len(),
            };
        }
        let text = rest.trim_end_matches('\n');
        Self {
            leading_newlines: raw.len() - rest.len(),
            text: text.to_string(),
            trailing_newlines: rest.len() - text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.leading_newlines == 0 && self.trailing_newlines == 0
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        push_newlines(out, self.leading_newlines);
        out.push_str(&self.text);
        push_newlines(out, self.trailing_newlines);
    }
}

impl fmt::Display for TextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

pub(crate) fn push_newlines(out: &mut String, count: usize) {
    out.extend(std::iter::repeat_n('\n', count));
}
