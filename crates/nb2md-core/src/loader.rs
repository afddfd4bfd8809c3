//! Notebook loader
//!
//! Parses Jupyter and Zeppelin documents into a [`Notebook`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{NotebookError, Result};
use crate::format::Format;
use crate::ipynb::{IpynbCell, IpynbNotebook, IpynbOutput};
use crate::model::{Cell, Dialect, Notebook, Output};
use crate::zeppelin::{ParagraphKind, ResultMessage, ZeppelinNote, classify, preview};

/// Load a notebook from text in the given dialect
pub fn load(text: &str, dialect: Dialect) -> Result<Notebook> {
    match dialect {
        Dialect::Jupyter => load_jupyter(text),
        Dialect::Zeppelin => load_zeppelin(text),
    }
}

/// Load a notebook, detecting the dialect from the source path or URI
pub fn load_path(text: &str, source: &str) -> Result<Notebook> {
    let format = Format::from_source(source)?;
    let dialect = format
        .dialect()
        .ok_or_else(|| NotebookError::UnsupportedFormat(source.to_string()))?;
    info!("Parsing {} notebook from {} ...", format, source);
    load(text, dialect)
}

/// Parse a Jupyter notebook
///
/// Raw cells have no counterpart in [`Cell`] and are dropped with a warning,
/// so a Jupyter to Jupyter conversion does not keep them. Stored execution
/// counts are replaced by a running index.
pub fn load_jupyter(text: &str) -> Result<Notebook> {
    let doc: IpynbNotebook = parse_document(text, &["cells"])?;

    let name = doc.name.clone().or_else(|| {
        doc.metadata
            .get("name")
            .and_then(Value::as_str)
            .map(String::from)
    });

    let mut cells = Vec::with_capacity(doc.cells.len());
    let mut execution_index = 0;

    for cell in doc.cells {
        match cell {
            IpynbCell::Markdown { source, .. } => cells.push(Cell::markdown(source.0)),
            IpynbCell::Code {
                source, outputs, ..
            } => {
                execution_index += 1;
                let outputs = outputs.iter().filter_map(jupyter_output).collect();
                cells.push(Cell::code(source.0, execution_index, outputs));
            }
            IpynbCell::Raw { .. } => warn!("Skipping raw cell"),
        }
    }

    info!("Notebook number of cells: {}", cells.len());

    Ok(Notebook::new(Dialect::Jupyter, name, cells))
}

/// Parse a Zeppelin note
pub fn load_zeppelin(text: &str) -> Result<Notebook> {
    let note: ZeppelinNote = parse_document(text, &["name", "paragraphs"])?;

    info!("Notebook name: {}", note.name);
    info!("Notebook number of paragraphs: {}", note.paragraphs.len());

    let mut cells = Vec::new();
    let mut markdown_count = 0;
    let mut execution_index = 0;

    for paragraph in &note.paragraphs {
        let Some(text) = paragraph.text.as_deref().filter(|t| !t.is_empty()) else {
            continue;
        };

        match classify(text) {
            ParagraphKind::Markdown(body) => {
                markdown_count += 1;
                cells.push(Cell::markdown(body));
            }
            ParagraphKind::Code => {
                execution_index += 1;
                let outputs = paragraph
                    .messages()
                    .iter()
                    .filter_map(zeppelin_output)
                    .collect();
                cells.push(Cell::code(text, execution_index, outputs));
            }
            ParagraphKind::Unsupported => {
                warn!("Unsupported paragraph type: '{}...'", preview(text));
            }
        }
    }

    info!(
        "Found {} Markdown cells and {} code cells",
        markdown_count, execution_index
    );

    Ok(Notebook::new(Dialect::Zeppelin, Some(note.name), cells))
}

/// Parse JSON text, check required top-level keys, then deserialize
fn parse_document<T: DeserializeOwned>(text: &str, required: &[&str]) -> Result<T> {
    let value: Value = serde_json::from_str(text)?;

    let object = value
        .as_object()
        .ok_or_else(|| NotebookError::Schema("top-level value is not an object".to_string()))?;
    if let Some(missing) = required.iter().find(|key| !object.contains_key(**key)) {
        return Err(NotebookError::Schema(format!(
            "missing required field '{}'",
            missing
        )));
    }

    serde_json::from_value(value).map_err(|e| NotebookError::Schema(e.to_string()))
}

/// Convert a Zeppelin result message; TABLE results are kept as plain text
fn zeppelin_output(msg: &ResultMessage) -> Option<Output> {
    match msg.kind.as_str() {
        "TEXT" | "TABLE" => Some(Output::text(&msg.data)),
        "HTML" => Some(Output::html(&msg.data)),
        other => {
            warn!("Unsupported output type: '{}'", other);
            debug!("Dropped output data: {:?}", msg.data);
            None
        }
    }
}

fn jupyter_output(output: &IpynbOutput) -> Option<Output> {
    match output {
        IpynbOutput::ExecuteResult { data, .. } | IpynbOutput::DisplayData { data, .. } => {
            IpynbOutput::bundle_text(data, "text/plain")
                .map(Output::text)
                .or_else(|| IpynbOutput::bundle_text(data, "text/html").map(Output::html))
                .or_else(|| {
                    let mimes: Vec<&str> = data.keys().map(String::as_str).collect();
                    warn!("Unsupported output data: {}", mimes.join(", "));
                    None
                })
        }
        IpynbOutput::Stream { text, .. } => Some(Output::text(text.0.clone())),
        IpynbOutput::Error { ename, .. } => {
            warn!("Skipping error output: '{}'", ename);
            None
        }
    }
}
