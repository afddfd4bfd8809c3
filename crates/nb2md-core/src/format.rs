//! Notebook file formats and extension-based detection

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use url::Url;

use crate::error::{NotebookError, Result};
use crate::model::Dialect;

/// Destination sentinel asking for a name derived from the notebook
pub const AUTO: &str = "auto";

/// A file format known to the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Jupyter notebook (`.ipynb`), readable and writable
    Jupyter,
    /// Zeppelin note export (`.json`), read only
    Zeppelin,
    /// Flattened Markdown (`.md`, `.nb.md`), write only
    Markdown,
}

/// Extension lookup table, matched case-insensitively against the last extension
const EXTENSIONS: &[(&str, Format)] = &[
    ("ipynb", Format::Jupyter),
    ("json", Format::Zeppelin),
    ("md", Format::Markdown),
];

impl Format {
    /// Look up a format by bare extension (no leading dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, format)| *format)
    }

    /// Detect the format of a path from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| NotebookError::UnsupportedFormat(path.display().to_string()))
    }

    /// Detect the format of a source path or URI
    ///
    /// For `http(s)://` and `s3://` sources only the URL path counts, so
    /// query strings and fragments (pre-signed URLs) are ignored.
    pub fn from_source(source: &str) -> Result<Self> {
        let url = Url::parse(source)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https" | "s3"));
        let Some(url) = url else {
            return Self::from_path(Path::new(source));
        };

        Path::new(url.path())
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| NotebookError::UnsupportedFormat(source.to_string()))
    }

    /// Input dialect for readable formats
    pub fn dialect(self) -> Option<Dialect> {
        match self {
            Format::Jupyter => Some(Dialect::Jupyter),
            Format::Zeppelin => Some(Dialect::Zeppelin),
            Format::Markdown => None,
        }
    }

    pub fn is_writable(self) -> bool {
        matches!(self, Format::Jupyter | Format::Markdown)
    }

    /// Extension appended to the notebook name when the destination is [`AUTO`]
    pub fn auto_extension(self) -> Option<&'static str> {
        match self {
            Format::Jupyter => Some("ipynb"),
            Format::Markdown => Some("nb.md"),
            Format::Zeppelin => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Jupyter => "jupyter",
            Format::Zeppelin => "zeppelin",
            Format::Markdown => "markdown",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = NotebookError;

    /// Accepts a format name or one of its extensions
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jupyter" => Ok(Format::Jupyter),
            "zeppelin" => Ok(Format::Zeppelin),
            "markdown" => Ok(Format::Markdown),
            other => Self::from_extension(other.trim_start_matches('.'))
                .ok_or_else(|| NotebookError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_path() {
        assert_eq!(
            Format::from_path(Path::new("note.json")).unwrap(),
            Format::Zeppelin
        );
        assert_eq!(
            Format::from_path(Path::new("dir/nb.IPYNB")).unwrap(),
            Format::Jupyter
        );
        assert_eq!(
            Format::from_path(Path::new("Demo.nb.md")).unwrap(),
            Format::Markdown
        );
    }

    #[test]
    fn test_unknown_extension() {
        let err = Format::from_path(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, NotebookError::UnsupportedFormat(p) if p == "notes.txt"));
        assert!(Format::from_path(Path::new("noextension")).is_err());
    }

    #[test]
    fn test_detect_from_source_uri() {
        assert_eq!(
            Format::from_source("https://bucket.s3.amazonaws.com/notes/demo.json?X-Amz-Signature=abc")
                .unwrap(),
            Format::Zeppelin
        );
        assert_eq!(
            Format::from_source("http://example.org/nb.ipynb#cell-3").unwrap(),
            Format::Jupyter
        );
        assert_eq!(
            Format::from_source("s3://bucket/notes/demo.json").unwrap(),
            Format::Zeppelin
        );
        assert_eq!(Format::from_source("local/nb.ipynb").unwrap(), Format::Jupyter);

        let err = Format::from_source("https://example.org/notes?file=demo.json").unwrap_err();
        assert!(
            matches!(err, NotebookError::UnsupportedFormat(s) if s == "https://example.org/notes?file=demo.json")
        );
    }

    #[test]
    fn test_capabilities() {
        assert!(Format::Jupyter.is_writable());
        assert!(Format::Markdown.is_writable());
        assert!(!Format::Zeppelin.is_writable());
        assert_eq!(Format::Markdown.dialect(), None);
        assert_eq!(Format::Zeppelin.dialect(), Some(Dialect::Zeppelin));
    }

    #[test]
    fn test_auto_extension() {
        assert_eq!(Format::Jupyter.auto_extension(), Some("ipynb"));
        assert_eq!(Format::Markdown.auto_extension(), Some("nb.md"));
        assert_eq!(Format::Zeppelin.auto_extension(), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("md".parse::<Format>().unwrap(), Format::Markdown);
        assert_eq!(".ipynb".parse::<Format>().unwrap(), Format::Jupyter);
        assert_eq!("Markdown".parse::<Format>().unwrap(), Format::Markdown);
        assert!("docx".parse::<Format>().is_err());
    }
}
