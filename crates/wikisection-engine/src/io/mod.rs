use crate::{
    document::Page,
    error::ParseError,
    models::{PAGE_EXTENSION, PageFile, PageIndex},
};
use log::{debug, warn};
use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid pages directory: {0}")]
    InvalidPagesDir(String),
    #[error("Failed to parse page: {0}")]
    Parse(#[from] ParseError),
}

/// Raw page as handed over by a page source.
///
/// The timestamp is opaque to the parser; it is carried through unchanged so
/// the caller can use it when saving the page back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage<T> {
    pub title: String,
    pub text: String,
    pub timestamp: T,
}

impl<T> FetchedPage<T> {
    pub fn parse(self) -> Result<(Page, T), ParseError> {
        let page = Page::parse(self.title, &self.text)?;
        Ok((page, self.timestamp))
    }

    /// Parse with every section body split into dictionary fields.
    pub fn parse_entry(self) -> Result<(Page, T), ParseError> {
        let page = Page::parse_entry(self.title, &self.text)?;
        Ok((page, self.timestamp))
    }
}

/// Somewhere pages can be fetched from and saved to.
pub trait PageSource {
    type Timestamp;

    fn fetch(&self, title: &str) -> Result<FetchedPage<Self::Timestamp>, IoError>;

    fn save(&self, title: &str, text: &str) -> Result<(), IoError>;
}

/// Pages stored as `<root>/<title>.wiki`, stamped with the file's
/// modification time.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, IoError> {
        let root = root.into();
        validate_pages_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Index of every page file below the root.
    pub fn index(&self) -> Result<PageIndex, IoError> {
        build_page_index(&self.root)
    }
}

impl PageSource for DirectorySource {
    type Timestamp = SystemTime;

    fn fetch(&self, title: &str) -> Result<FetchedPage<SystemTime>, IoError> {
        let file = PageFile::for_title(title);
        let text = read_file(file.relative_path(), &self.root)?;
        let timestamp = fs::metadata(file.relative_path().to_path(&self.root))?.modified()?;
        debug!("fetched {title:?} ({} bytes)", text.len());
        Ok(FetchedPage {
            title: title.to_string(),
            text,
            timestamp,
        })
    }

    fn save(&self, title: &str, text: &str) -> Result<(), IoError> {
        let file = PageFile::for_title(title);
        write_file(file.relative_path(), &self.root, text)?;
        debug!("saved {title:?} ({} bytes)", text.len());
        Ok(())
    }
}

/// Read a page file and return its content
pub fn read_file(relative_path: &RelativePath, pages_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(pages_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write content to a page file, creating parent directories as needed
pub fn write_file(
    relative_path: &RelativePath,
    pages_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(pages_root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Scan for `.wiki` page files in the pages directory
pub fn scan_page_files(pages_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !pages_root.exists() {
        return Err(IoError::InvalidPagesDir(
            "pages directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(pages_root, &mut files)?;
    files.sort();
    Ok(files)
}

/// Build a sorted index of page files in the pages directory
pub fn build_page_index(pages_root: &Path) -> Result<PageIndex, IoError> {
    let files = scan_page_files(pages_root)?;
    let mut index = PageIndex::new();
    index.add_files(
        files
            .iter()
            .filter_map(|path| PageFile::from_absolute(path, pages_root)),
    );
    Ok(index)
}

/// Parse every page in the directory, skipping (and logging) pages that
/// fail to parse.
pub fn load_pages(pages_root: &Path, dictionary: bool) -> Result<Vec<Page>, IoError> {
    let index = build_page_index(pages_root)?;
    let mut pages = Vec::with_capacity(index.len());
    for file in index.files() {
        let text = read_file(file.relative_path(), pages_root)?;
        let parsed = if dictionary {
            Page::parse_entry(file.title(), &text)
        } else {
            Page::parse(file.title(), &text)
        };
        match parsed {
            Ok(page) => pages.push(page),
            Err(err) => warn!("skipping {:?}: {err}", file.title()),
        }
    }
    Ok(pages)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == PAGE_EXTENSION
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_pages_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidPagesDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_file, create_test_pages_dir};

    #[test]
    fn test_scan_page_files() {
        // Given a pages directory with wiki files
        let pages_dir = create_test_pages_dir();
        create_test_file(&pages_dir, "kot.wiki", "== kot ==\nzwierzę");
        create_test_file(&pages_dir, "pies.wiki", "== pies ==\nzwierzę");

        // When scanning for files
        let files = scan_page_files(pages_dir.path()).unwrap();

        // Then both pages are found
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.file_name().unwrap() == "kot.wiki"));
        assert!(files.iter().any(|f| f.file_name().unwrap() == "pies.wiki"));
    }

    #[test]
    fn test_handle_invalid_pages_directory() {
        let nonexistent_path = PathBuf::from("/this/path/does/not/exist");

        let result = scan_page_files(&nonexistent_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("pages directory"));
    }

    #[test]
    fn test_scan_nested_directories_and_ignore_other_files() {
        let pages_dir = create_test_pages_dir();
        create_test_file(&pages_dir, "kot.wiki", "== kot ==");
        create_test_file(&pages_dir, "notes.md", "# not a page");
        let sub_dir = pages_dir.path().join("Aneks");
        std::fs::create_dir(&sub_dir).unwrap();
        std::fs::write(sub_dir.join("Skróty.wiki"), "== Skróty ==").unwrap();

        let files = scan_page_files(pages_dir.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.file_name().unwrap() == "Skróty.wiki"));
    }

    #[test]
    fn test_validate_pages_dir() {
        let pages_dir = create_test_pages_dir();
        assert!(validate_pages_dir(pages_dir.path()).is_ok());
        assert!(matches!(
            validate_pages_dir(Path::new("/nonexistent/path")),
            Err(IoError::InvalidPagesDir(_))
        ));
    }

    #[test]
    fn test_read_file_not_found() {
        let pages_dir = create_test_pages_dir();
        let result = read_file(RelativePath::new("nonexistent.wiki"), pages_dir.path());
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_write_file_creates_parent_directories() {
        let pages_dir = create_test_pages_dir();
        let relative_path = RelativePath::new("Aneks/Skróty.wiki");

        write_file(relative_path, pages_dir.path(), "== Skróty ==").unwrap();

        let written = read_file(relative_path, pages_dir.path()).unwrap();
        assert_eq!(written, "== Skróty ==");
        assert!(pages_dir.path().join("Aneks").is_dir());
    }

    #[test]
    fn test_fetch_parse_and_save_round_trip() {
        let pages_dir = create_test_pages_dir();
        let text = "{{odnośniki}}\n== kot ({{język polski}}) ==\n{{znaczenia}}\n: (1.1) zwierzę\n";
        create_test_file(&pages_dir, "kot.wiki", text);
        let source = DirectorySource::new(pages_dir.path()).unwrap();

        let fetched = source.fetch("kot").unwrap();
        let expected_timestamp = fetched.timestamp;
        let (page, timestamp) = fetched.parse_entry().unwrap();

        assert_eq!(timestamp, expected_timestamp);
        assert_eq!(page.title(), "kot");
        assert_eq!(page.len(), 1);

        source.save("kot", &page.to_string()).unwrap();
        assert_eq!(source.fetch("kot").unwrap().text, text);
    }

    #[test]
    fn test_fetch_missing_page() {
        let pages_dir = create_test_pages_dir();
        let source = DirectorySource::new(pages_dir.path()).unwrap();
        assert!(matches!(source.fetch("brak"), Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_directory_source_requires_directory() {
        assert!(matches!(
            DirectorySource::new("/nonexistent/path"),
            Err(IoError::InvalidPagesDir(_))
        ));
    }

    #[test]
    fn test_load_pages() {
        let pages_dir = create_test_pages_dir();
        create_test_file(&pages_dir, "b.wiki", "== b ==");
        create_test_file(&pages_dir, "a.wiki", "== a ==\n{{uwagi}} x");

        let pages = load_pages(pages_dir.path(), true).unwrap();
        let titles: Vec<_> = pages.iter().map(|page| page.title()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert!(pages[0].sections().next().unwrap().1.fields().is_some());
    }
}
