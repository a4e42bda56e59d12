use std::collections::BTreeMap;

use super::page_file::PageFile;

/// Discovered page files, keyed and sorted by title.
#[derive(Debug, Default)]
pub struct PageIndex {
    pages: BTreeMap<String, PageFile>,
}

impl PageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; a file with the same title replaces the earlier one.
    pub fn add_file(&mut self, file: PageFile) {
        self.pages.insert(file.title().to_string(), file);
    }

    pub fn add_files(&mut self, files: impl IntoIterator<Item = PageFile>) {
        for file in files {
            self.add_file(file);
        }
    }

    pub fn get(&self, title: &str) -> Option<&PageFile> {
        self.pages.get(title)
    }

    /// All files, sorted by title
    pub fn files(&self) -> impl Iterator<Item = &PageFile> {
        self.pages.values()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn remove(&mut self, title: &str) -> Option<PageFile> {
        self.pages.remove(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_index_is_empty() {
        let index = PageIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_titles_sorted() {
        let mut index = PageIndex::new();
        index.add_files([
            PageFile::from("pies.wiki"),
            PageFile::from("kot.wiki"),
            PageFile::from("Aneks/Skróty.wiki"),
        ]);

        let titles: Vec<_> = index.titles().collect();
        assert_eq!(titles, vec!["Aneks/Skróty", "kot", "pies"]);
    }

    #[test]
    fn test_duplicate_title_overwrites() {
        let mut index = PageIndex::new();
        index.add_file(PageFile::from("kot.wiki"));
        index.add_file(PageFile::for_title("kot"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("kot").unwrap().relative_path().as_str(), "kot.wiki");
    }

    #[test]
    fn test_remove() {
        let mut index = PageIndex::new();
        index.add_file(PageFile::from("kot.wiki"));

        assert!(index.remove("kot").is_some());
        assert!(index.remove("kot").is_none());
        assert!(index.is_empty());
    }
}
