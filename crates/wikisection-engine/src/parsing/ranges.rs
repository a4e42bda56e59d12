use std::ops::Range;

/// A start/end token pair whose enclosed text is invisible to heading and
/// field marker detection.
///
/// A pair with an empty token never matches anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub start: &'static str,
    pub end: &'static str,
    /// An unterminated start token swallows the rest of the text.
    pub lazy: bool,
}

impl Delimiters {
    pub const fn new(start: &'static str, end: &'static str, lazy: bool) -> Self {
        Self { start, end, lazy }
    }
}

pub const COMMENT: Delimiters = Delimiters::new("<!--", "-->", true);
pub const NOWIKI: Delimiters = Delimiters::new("<nowiki>", "</nowiki>", false);
pub const PRE: Delimiters = Delimiters::new("<pre>", "</pre>", false);
pub const SOURCE: Delimiters = Delimiters::new("<source", "</source>", false);
pub const SYNTAX_HIGHLIGHT: Delimiters =
    Delimiters::new("<syntaxhighlight", "</syntaxhighlight>", false);
pub const MATH: Delimiters = Delimiters::new("<math>", "</math>", false);

/// Everything the page parser masks out before looking for headings.
pub const WIKITEXT: &[Delimiters] = &[COMMENT, NOWIKI, PRE, SOURCE, SYNTAX_HIGHLIGHT, MATH];

/// Sorted, non-overlapping byte ranges of a text that must be skipped when
/// looking for structure.
///
/// Ranges are half-open (`start..end`) and always include both delimiter
/// tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoredRanges {
    ranges: Vec<Range<usize>>,
}

impl IgnoredRanges {
    /// Scan `text` for every delimiter pair and merge the results.
    pub fn scan(text: &str, delimiters: &[Delimiters]) -> Self {
        let mut found: Vec<Range<usize>> = delimiters
            .iter()
            .flat_map(|d| find_pair(text, d))
            .collect();

        // Wider range first when two start at the same offset, so the
        // narrower one is recognized as contained.
        found.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut ranges: Vec<Range<usize>> = Vec::with_capacity(found.len());
        for range in found {
            if let Some(last) = ranges.last_mut()
                && range.start < last.end
            {
                if range.end > last.end {
                    last.end = range.end;
                }
                continue;
            }
            ranges.push(range);
        }

        Self { ranges }
    }

    /// Ranges for the standard wikitext delimiter set.
    pub fn for_wikitext(text: &str) -> Self {
        Self::scan(text, WIKITEXT)
    }

    /// True if the byte at `pos` lies inside an ignored range.
    pub fn contains(&self, pos: usize) -> bool {
        let idx = self.ranges.partition_point(|r| r.end <= pos);
        self.ranges
            .get(idx)
            .is_some_and(|r| r.start <= pos && pos < r.end)
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

fn find_pair(text: &str, delimiters: &Delimiters) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    if delimiters.start.is_empty() || delimiters.end.is_empty() {
        return out;
    }
    let mut from = 0;

    while let Some(rel) = text[from..].find(delimiters.start) {
        let start = from + rel;
        let body = start + delimiters.start.len();
        match text[body..].find(delimiters.end) {
            Some(rel_end) => {
                let end = body + rel_end + delimiters.end.len();
                out.push(start..end);
                from = end;
            }
            None if delimiters.lazy => {
                out.push(start..text.len());
                break;
            }
            None => break,
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_no_delimiters_yields_no_ranges() {
        let ranges = IgnoredRanges::for_wikitext("== A ==\nplain text");
        assert!(ranges.is_empty());
        assert!(!ranges.contains(0));
    }

    #[test]
    fn test_comment_range_includes_both_tokens() {
        let text = "ab<!-- x -->cd";
        let ranges = IgnoredRanges::for_wikitext(text);
        assert_eq!(ranges.ranges(), &[2..12]);
        assert_eq!(&text[2..12], "<!-- x -->");
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        let text = "ab<!-- never closed\n== A ==";
        let ranges = IgnoredRanges::for_wikitext(text);
        assert_eq!(ranges.ranges(), &[2..text.len()]);
    }

    #[test]
    fn test_unterminated_strict_pair_stops_matching() {
        let text = "<nowiki>a</nowiki> <nowiki>b";
        let ranges = IgnoredRanges::for_wikitext(text);
        assert_eq!(ranges.ranges(), &[0..18]);
    }

    #[test]
    fn test_contained_range_is_dropped() {
        let text = "<pre><!-- c --></pre>";
        let ranges = IgnoredRanges::for_wikitext(text);
        assert_eq!(ranges.ranges(), &[0..text.len()]);
    }

    #[test]
    fn test_partial_overlap_is_merged() {
        let text = "<nowiki><!--</nowiki>-->";
        let ranges = IgnoredRanges::for_wikitext(text);
        assert_eq!(ranges.ranges(), &[0..text.len()]);
    }

    #[test]
    fn test_multiple_ranges_stay_sorted() {
        let text = "<math>x</math> a <!--b--> c <pre>d</pre>";
        let ranges = IgnoredRanges::for_wikitext(text);
        let starts: Vec<_> = ranges.ranges().iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0, 17, 28]);
    }

    #[rstest]
    #[case(Delimiters::new("", "-->", true))]
    #[case(Delimiters::new("<!--", "", true))]
    #[case(Delimiters::new("", "", false))]
    fn test_empty_token_matches_nothing(#[case] delimiters: Delimiters) {
        let ranges = IgnoredRanges::scan("a <!-- b --> c", &[delimiters, NOWIKI]);
        assert!(ranges.is_empty());
    }

    #[rstest]
    #[case(0, false)]
    #[case(2, true)]
    #[case(11, true)]
    #[case(12, false)]
    fn test_contains(#[case] pos: usize, #[case] expected: bool) {
        let ranges = IgnoredRanges::for_wikitext("ab<!-- x -->cd");
        assert_eq!(ranges.contains(pos), expected);
    }
}
