//! Notebook writers
//!
//! Renders a [`Notebook`] as a Jupyter notebook or as flattened Markdown,
//! and saves it to a resolved destination.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{NotebookError, Result};
use crate::format::{AUTO, Format};
use crate::ipynb::{
    IpynbCell, IpynbNotebook, IpynbOutput, MultilineString, NBFORMAT, NBFORMAT_MINOR, split_lines,
};
use crate::model::{Cell, MimeType, Notebook, Output};

/// Format used when the destination is [`AUTO`] and no target is given
pub const DEFAULT_TARGET: Format = Format::Markdown;

/// Resolve the output path and format for a destination
///
/// `destination` is either a path, whose extension selects the format, or
/// [`AUTO`], in which case the path is derived from the notebook name and
/// `target` selects the format.
pub fn resolve_destination(
    notebook: &Notebook,
    destination: &str,
    target: Option<Format>,
) -> Result<(PathBuf, Format)> {
    if destination != AUTO {
        let path = PathBuf::from(destination);
        let format = Format::from_path(&path)?;
        if !format.is_writable() {
            return Err(NotebookError::UnsupportedFormat(destination.to_string()));
        }
        if target.is_some_and(|t| t != format) {
            debug!("Destination extension overrides target format {:?}", target);
        }
        return Ok((path, format));
    }

    let format = target.unwrap_or(DEFAULT_TARGET);
    let ext = format
        .auto_extension()
        .ok_or_else(|| NotebookError::UnsupportedFormat(format!("{} ({})", AUTO, format)))?;
    let name = notebook.name.as_deref().ok_or(NotebookError::Naming)?;
    let path = PathBuf::from(format!("{}.{}", name, ext));

    info!(
        "Using notebook name as {} notebook base pathname: {}",
        format,
        path.display()
    );

    Ok((path, format))
}

/// Render a notebook in a writable format
pub fn render(notebook: &Notebook, format: Format) -> Result<String> {
    match format {
        Format::Jupyter => notebook_to_ipynb(notebook),
        Format::Markdown => Ok(notebook_to_markdown(notebook)),
        Format::Zeppelin => Err(NotebookError::UnsupportedFormat(format.to_string())),
    }
}

/// Render and write a notebook, returning the path written
pub fn save(notebook: &Notebook, destination: &str, target: Option<Format>) -> Result<PathBuf> {
    let (path, format) = resolve_destination(notebook, destination, target)?;
    let content = render(notebook, format)?;

    info!("Saving notebook to {} ...", path.display());
    write_file(&path, &content)?;

    Ok(path)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let io_err = |source| NotebookError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}

/// Render a notebook as nbformat v4 JSON
///
/// Keys are sorted and indented by one space, matching what Jupyter writes.
pub fn notebook_to_ipynb(notebook: &Notebook) -> Result<String> {
    let mut metadata = Map::new();
    if let Some(name) = &notebook.name {
        metadata.insert("name".to_string(), Value::String(name.clone()));
    }

    let doc = IpynbNotebook {
        cells: notebook.cells.iter().map(ipynb_cell).collect(),
        metadata,
        nbformat: NBFORMAT,
        nbformat_minor: NBFORMAT_MINOR,
        name: None,
    };

    // Going through Value sorts every object by key
    let value = serde_json::to_value(&doc).map_err(NotebookError::Serialize)?;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(NotebookError::Serialize)?;
    buf.push(b'\n');

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn ipynb_cell(cell: &Cell) -> IpynbCell {
    let source = MultilineString(cell.source().to_string());
    match cell {
        Cell::Markdown { .. } => IpynbCell::Markdown {
            metadata: Map::new(),
            source,
        },
        Cell::Code {
            execution_index,
            outputs,
            ..
        } => IpynbCell::Code {
            execution_count: Some(*execution_index),
            metadata: Map::new(),
            outputs: outputs
                .iter()
                .map(|o| ipynb_output(o, *execution_index))
                .collect(),
            source,
        },
    }
}

fn ipynb_output(output: &Output, execution_count: u32) -> IpynbOutput {
    let lines: Vec<Value> = split_lines(&output.data)
        .into_iter()
        .map(|line| Value::String(line.to_string()))
        .collect();

    IpynbOutput::ExecuteResult {
        data: BTreeMap::from([(output.mime_type.as_str().to_string(), Value::Array(lines))]),
        execution_count: Some(execution_count),
        metadata: Map::new(),
    }
}

/// Render a notebook as flattened Markdown
pub fn notebook_to_markdown(notebook: &Notebook) -> String {
    let mut writer = MarkdownWriter::new();
    writer.write_notebook(notebook)
}

/// Markdown writer state
struct MarkdownWriter {
    output: String,
    /// Code cells written so far
    code_count: u32,
}

impl MarkdownWriter {
    fn new() -> Self {
        Self {
            output: String::new(),
            code_count: 0,
        }
    }

    fn write_notebook(&mut self, notebook: &Notebook) -> String {
        for cell in &notebook.cells {
            match cell {
                Cell::Markdown { source } => self.output.push_str(source),
                Cell::Code {
                    source, outputs, ..
                } => self.write_code(source, outputs),
            }
        }

        std::mem::take(&mut self.output)
    }

    fn write_code(&mut self, source: &str, outputs: &[Output]) {
        self.code_count += 1;

        let title = code_title(source)
            .map(|t| format!(": {}", t))
            .unwrap_or_default();
        self.output
            .push_str(&format!("\n\n---\n\n### [#{}]{}\n\n", self.code_count, title));

        self.write_fenced(source);

        if !outputs.is_empty() {
            self.output.push_str("Output:\n");
        }
        for output in outputs {
            match output.mime_type {
                MimeType::Text => self.write_fenced(&output.data),
                // HTML results have no Markdown rendering yet
                MimeType::Html => debug!("Skipping HTML output of code cell {}", self.code_count),
            }
        }
    }

    fn write_fenced(&mut self, content: &str) {
        let fence = "`".repeat(calculate_fence_length(content));
        self.output.push('\n');
        self.output.push_str(&fence);
        self.output.push('\n');
        self.output.push_str(content);
        self.output.push('\n');
        self.output.push_str(&fence);
        self.output.push('\n');
    }
}

/// Title of a code cell whose first line is a `///` comment
fn code_title(source: &str) -> Option<String> {
    let first_line = source.lines().next()?;
    let title = first_line.strip_prefix("///")?;
    Some(capitalize(title.trim()))
}

/// Upper-case the first character and lower-case the rest
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Calculate the minimum fence length needed for a code block.
///
/// The fence must be longer than any sequence of consecutive backticks in the content.
/// Returns at least 3 (the minimum for a valid fenced code block).
fn calculate_fence_length(content: &str) -> usize {
    let mut max_backticks = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == '`' {
            current_run += 1;
            max_backticks = max_backticks.max(current_run);
        } else {
            current_run = 0;
        }
    }

    3.max(max_backticks + 1)
}
