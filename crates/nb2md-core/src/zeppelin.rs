//! Zeppelin note export types and paragraph classification

use serde::Deserialize;

/// Interpreter tags whose paragraphs become code cells
///
/// Paragraphs without any `%` tag are code as well.
pub const CODE_INTERPRETERS: &[&str] = &["%sh", "%spark.dep", "%pyspark", "%spark", "%sql"];

/// Interpreter tag of Markdown paragraphs
pub const MARKDOWN_INTERPRETER: &str = "%md";

/// A Zeppelin note as exported to JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ZeppelinNote {
    pub name: String,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub results: Option<ParagraphResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParagraphResults {
    #[serde(default)]
    pub msg: Vec<ResultMessage>,
}

/// One result message of a paragraph run
#[derive(Debug, Clone, Deserialize)]
pub struct ResultMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: String,
}

impl Paragraph {
    /// Result messages, empty when the paragraph was never run
    pub fn messages(&self) -> &[ResultMessage] {
        self.results
            .as_ref()
            .map(|r| r.msg.as_slice())
            .unwrap_or_default()
    }
}

/// How a paragraph is converted, decided by its interpreter tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind<'a> {
    /// Markdown paragraph; carries the body without the tag, trimmed
    Markdown(&'a str),
    /// Code paragraph; the tag stays part of the source
    Code,
    /// Paragraph for an interpreter the converter does not handle
    Unsupported,
}

/// Classify paragraph text by its interpreter tag
pub fn classify(text: &str) -> ParagraphKind<'_> {
    if let Some(body) = text.strip_prefix(MARKDOWN_INTERPRETER) {
        ParagraphKind::Markdown(body.trim())
    } else if !text.starts_with('%') || CODE_INTERPRETERS.iter().any(|tag| text.starts_with(tag)) {
        ParagraphKind::Code
    } else {
        ParagraphKind::Unsupported
    }
}

/// First ten characters of a paragraph, for diagnostics
pub fn preview(text: &str) -> String {
    text.chars().take(10).collect::<String>().trim().to_string()
}
