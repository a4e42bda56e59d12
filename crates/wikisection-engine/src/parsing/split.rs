use log::trace;

use super::{heading::parse_heading_line, ranges::IgnoredRanges};

/// A page body cut at its heading lines.
///
/// `intro` followed by every entry of `chunks` is exactly the original text.
/// Every chunk starts with a heading line; every chunk except the last ends
/// with the line break that precedes the next heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPage<'a> {
    pub intro: &'a str,
    pub chunks: Vec<&'a str>,
}

/// Split `text` at every line that is a real heading.
///
/// A heading-shaped line whose opening equals run lies inside an ignored
/// range (for example a commented-out heading) is not a split point.
pub fn split_sections<'a>(text: &'a str, ignored: &IgnoredRanges) -> SplitPage<'a> {
    let mut boundaries = Vec::new();
    let mut line_start = 0;

    for line in text.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        if let Some(heading) = parse_heading_line(content) {
            let equals_at = line_start + heading.equals_offset();
            if ignored.contains(equals_at) {
                trace!("skipping masked heading at byte {line_start}: {content:?}");
            } else {
                boundaries.push(line_start);
            }
        }
        line_start += line.len();
    }

    let intro_end = boundaries.first().copied().unwrap_or(text.len());
    let chunks = boundaries
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = boundaries.get(i + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect();

    SplitPage {
        intro: &text[..intro_end],
        chunks,
    }
}
