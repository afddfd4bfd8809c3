//! Normalized notebook representation
//!
//! Both input dialects are parsed into these types, and both writers
//! consume them.

/// Dialect a notebook was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Cell-structured Jupyter notebook (`.ipynb`)
    Jupyter,
    /// Paragraph-structured Zeppelin note (`.json`)
    Zeppelin,
}

/// A loaded notebook
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    /// Dialect the notebook was read from
    pub format: Dialect,
    /// Notebook name, used to derive output file names
    pub name: Option<String>,
    /// Cells in source order
    pub cells: Vec<Cell>,
}

impl Notebook {
    pub fn new(format: Dialect, name: Option<String>, cells: Vec<Cell>) -> Self {
        Self {
            format,
            name,
            cells,
        }
    }

    /// Number of Markdown cells
    pub fn markdown_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, Cell::Markdown { .. }))
            .count()
    }

    /// Number of code cells
    pub fn code_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, Cell::Code { .. }))
            .count()
    }
}

/// A notebook cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Markdown {
        source: String,
    },
    Code {
        source: String,
        /// 1-based position among the code cells of the notebook
        execution_index: u32,
        outputs: Vec<Output>,
    },
}

impl Cell {
    pub fn markdown(source: impl Into<String>) -> Self {
        Cell::Markdown {
            source: source.into(),
        }
    }

    pub fn code(source: impl Into<String>, execution_index: u32, outputs: Vec<Output>) -> Self {
        Cell::Code {
            source: source.into(),
            execution_index,
            outputs,
        }
    }

    /// Source text of either cell kind
    pub fn source(&self) -> &str {
        match self {
            Cell::Markdown { source } | Cell::Code { source, .. } => source,
        }
    }
}

/// MIME type of a cell output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeType {
    Text,
    Html,
}

impl MimeType {
    /// MIME string used in Jupyter output bundles
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Text => "text/plain",
            MimeType::Html => "text/html",
        }
    }
}

/// A single output record of a code cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub mime_type: MimeType,
    pub data: String,
}

impl Output {
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            mime_type: MimeType::Text,
            data: data.into(),
        }
    }

    pub fn html(data: impl Into<String>) -> Self {
        Self {
            mime_type: MimeType::Html,
            data: data.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_counts() {
        let nb = Notebook::new(
            Dialect::Zeppelin,
            None,
            vec![
                Cell::markdown("# Title"),
                Cell::code("x = 1", 1, vec![]),
                Cell::code("print(x)", 2, vec![Output::text("1")]),
            ],
        );
        assert_eq!(nb.markdown_count(), 1);
        assert_eq!(nb.code_count(), 2);
    }

    #[test]
    fn test_mime_strings() {
        assert_eq!(MimeType::Text.as_str(), "text/plain");
        assert_eq!(MimeType::Html.as_str(), "text/html");
    }

    #[test]
    fn test_cell_source() {
        assert_eq!(Cell::markdown("hi").source(), "hi");
        assert_eq!(Cell::code("x = 1", 1, vec![]).source(), "x = 1");
    }
}
