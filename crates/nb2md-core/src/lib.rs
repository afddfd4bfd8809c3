//! nb2md-core: Core library for converting notebooks to Jupyter and Markdown
//!
//! This crate provides:
//! - A normalized notebook model (Markdown and code cells with outputs)
//! - Loaders for Jupyter (`.ipynb`) and Zeppelin (`.json`) notebooks
//! - Writers for Jupyter notebooks and flattened Markdown
//!
//! ## Features
//!
//! - `remote`: Read sources from S3 and HTTP(S) (requires network access)
//!
//! ## Example
//!
//! ```rust
//! use nb2md_core::{Dialect, load, notebook_to_markdown};
//!
//! let note = r#"{"name": "Demo", "paragraphs": [{"text": "%md **hi**"}]}"#;
//! let notebook = load(note, Dialect::Zeppelin).unwrap();
//! assert_eq!(notebook_to_markdown(&notebook), "**hi**");
//! ```

pub mod error;
pub mod format;
pub mod ipynb;
pub mod loader;
pub mod model;
#[cfg(feature = "remote")]
pub mod remote;
pub mod writer;
pub mod zeppelin;

pub use error::{NotebookError, Result};
pub use format::{AUTO, Format};
pub use loader::{load, load_jupyter, load_path, load_zeppelin};
pub use model::{Cell, Dialect, MimeType, Notebook, Output};
#[cfg(feature = "remote")]
pub use remote::{FetchError, FetchOptions, SourceLocation, read_source};
pub use writer::{notebook_to_ipynb, notebook_to_markdown, render, resolve_destination, save};
