// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_entry_page(languages: usize) -> String {
    let mut content = String::from("{{podobne|Kot}}\n");

    for language in 0..languages {
        content.push_str(&format!("== kot ({{{{język {language}}}}}) ==\n"));
        content.push_str("{{wymowa}} {{IPA|kɔt}}\n");
        content.push_str("{{znaczenia}}\n''rzeczownik''\n: (1.1) zwierzę\n: (1.2) samiec\n");
        content.push_str("<!-- {{uwagi}} schowane -->\n");
        content.push_str("{{przykłady}}\n: (1.1) ''Kot śpi.''\n");
        content.push_str("{{tłumaczenia}}\n* angielski: (1.1) [[cat]]\n");
        content.push_str("{{źródła}}\n<references />\n\n");
    }

    content
}

#[allow(dead_code)]
pub fn generate_nested_page(sections: usize, depth: usize) -> String {
    let mut content = String::new();

    for section in 0..sections {
        content.push_str(&format!("== Section {section} ==\n\n"));
        content.push_str(&generate_nested_content(depth, 3));
    }

    content
}

#[allow(dead_code)]
fn generate_nested_content(remaining_depth: usize, current_level: usize) -> String {
    if remaining_depth == 0 || current_level > 6 {
        return String::new();
    }

    let equals = "=".repeat(current_level);
    let mut content = format!("{equals} Level {current_level} {equals}\n");
    content.push_str("Some paragraph content with multiple sentences.\n");
    if current_level % 2 == 0 {
        content.push_str("<pre>\n== not a heading ==\n</pre>\n");
    }
    content.push('\n');

    content.push_str(&generate_nested_content(
        remaining_depth - 1,
        current_level + 1,
    ));
    content
}
