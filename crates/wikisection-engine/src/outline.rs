use std::fmt::Write;

use crate::document::Page;

/// One line per section, indented by depth.
///
/// ```text
/// L2 kot ({{język polski}}) [Pronunciation, Definitions]
///   L3 Etymologia
/// ```
///
/// Field kinds are listed for dictionary sections that have any.
pub fn render(page: &Page) -> String {
    let mut out = String::new();
    for (id, section) in page.sections() {
        let depth = page.depth(id).unwrap_or(1);
        let indent = "  ".repeat(depth.saturating_sub(1));
        let _ = write!(out, "{indent}L{} {}", section.level(), section.header);
        if let Some(fields) = section.fields()
            && !fields.is_empty()
        {
            let kinds: Vec<String> = fields.kinds().map(|kind| format!("{kind:?}")).collect();
            let _ = write!(out, " [{}]", kinds.join(", "));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_scenario_outline() {
        let page = Page::parse("t", "==A==\nfoo\n===B===\nbar\n==C==\nbaz").unwrap();
        assert_snapshot!(render(&page), @r"
        L2 A
          L3 B
        L2 C
        ");
    }

    #[test]
    fn test_dictionary_outline() {
        let text = "== kot ({{język polski}}) ==\n{{wymowa}} {{IPA|kɔt}}\n{{znaczenia}}\n: (1.1) zwierzę\n=== Uwagi ===\ntekst";
        let page = Page::parse_entry("kot", text).unwrap();
        assert_snapshot!(render(&page), @r"
        L2 kot ({{język polski}}) [Pronunciation, Definitions]
          L3 Uwagi
        ");
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(render(&Page::create("t")), "");
    }
}
