use std::path::Path;

use relative_path::{RelativePath, RelativePathBuf};

/// File extension of page files, without the dot.
pub const PAGE_EXTENSION: &str = "wiki";

/// A page stored on disk: its path relative to the pages root and the page
/// title derived from it.
///
/// `Aneks/Skróty.wiki` holds the page titled `Aneks/Skróty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    relative_path: RelativePathBuf,
    title: String,
}

impl PageFile {
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let title = Self::extract_title(&relative_path);
        Self {
            relative_path,
            title,
        }
    }

    /// The file a page with this title is stored in.
    pub fn for_title(title: &str) -> Self {
        Self {
            relative_path: RelativePathBuf::from(format!("{title}.{PAGE_EXTENSION}")),
            title: title.to_string(),
        }
    }

    /// Build from an absolute path below `root`; `None` if it is outside.
    pub fn from_absolute(path: &Path, root: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        RelativePathBuf::from_path(relative).ok().map(Self::new)
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn extract_title(path: &RelativePath) -> String {
        let path = path.as_str();
        path.strip_suffix(&format!(".{PAGE_EXTENSION}"))
            .unwrap_or(path)
            .to_string()
    }
}

impl From<RelativePathBuf> for PageFile {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for PageFile {
    fn from(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("kot.wiki", "kot")]
    #[case("Aneks/Skróty.wiki", "Aneks/Skróty")]
    #[case("README", "README")]
    fn test_title_from_path(#[case] path: &str, #[case] title: &str) {
        assert_eq!(PageFile::from(path).title(), title);
    }

    #[test]
    fn test_for_title_round_trips() {
        let file = PageFile::for_title("Aneks/Skróty");
        assert_eq!(file.relative_path().as_str(), "Aneks/Skróty.wiki");
        assert_eq!(file, PageFile::from("Aneks/Skróty.wiki"));
    }

    #[test]
    fn test_from_absolute() {
        let root = Path::new("/pages");
        let file = PageFile::from_absolute(Path::new("/pages/a/b.wiki"), root).unwrap();
        assert_eq!(file.title(), "a/b");
        assert!(PageFile::from_absolute(Path::new("/elsewhere/c.wiki"), root).is_none());
    }
}
