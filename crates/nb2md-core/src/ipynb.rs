//! Jupyter notebook (nbformat v4) document types
//!
//! Only the parts of the schema the converter reads or writes are modelled;
//! unknown keys are ignored when reading.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const NBFORMAT: u32 = 4;
pub const NBFORMAT_MINOR: u32 = 4;

/// Top-level notebook document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpynbNotebook {
    pub cells: Vec<IpynbCell>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub nbformat: u32,
    #[serde(default)]
    pub nbformat_minor: u32,
    /// Non-standard top-level name, accepted when reading
    #[serde(default, skip_serializing)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum IpynbCell {
    Markdown {
        #[serde(default)]
        metadata: Map<String, Value>,
        source: MultilineString,
    },
    Code {
        execution_count: Option<u32>,
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(default)]
        outputs: Vec<IpynbOutput>,
        source: MultilineString,
    },
    Raw {
        #[serde(default)]
        metadata: Map<String, Value>,
        source: MultilineString,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum IpynbOutput {
    ExecuteResult {
        /// MIME bundle; values are strings or line lists for text types
        data: BTreeMap<String, Value>,
        execution_count: Option<u32>,
        #[serde(default)]
        metadata: Map<String, Value>,
    },
    DisplayData {
        data: BTreeMap<String, Value>,
        #[serde(default)]
        metadata: Map<String, Value>,
    },
    Stream {
        #[serde(default)]
        name: String,
        text: MultilineString,
    },
    Error {
        ename: String,
        evalue: String,
        #[serde(default)]
        traceback: Vec<String>,
    },
}

impl IpynbOutput {
    /// Extract a text value for `mime` from a MIME bundle
    pub fn bundle_text(data: &BTreeMap<String, Value>, mime: &str) -> Option<String> {
        match data.get(mime)? {
            Value::String(s) => Some(s.clone()),
            Value::Array(lines) => Some(lines.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }
}

/// A string stored either as one JSON string or as a list of lines
///
/// Always written as a list of lines, each keeping its trailing newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultilineString(pub String);

impl MultilineString {
    pub fn lines(&self) -> Vec<&str> {
        split_lines(&self.0)
    }
}

/// Split text into lines, keeping line terminators
pub fn split_lines(s: &str) -> Vec<&str> {
    s.split_inclusive('\n').collect()
}

impl Serialize for MultilineString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.lines())
    }
}

impl<'de> Deserialize<'de> for MultilineString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Lines(Vec<String>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::One(s) => MultilineString(s),
            Repr::Lines(lines) => MultilineString(lines.concat()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_keeps_terminators() {
        assert_eq!(split_lines("a\nb\n"), vec!["a\n", "b\n"]);
        assert_eq!(split_lines("a\nb"), vec!["a\n", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_multiline_accepts_both_shapes() {
        let one: MultilineString = serde_json::from_str(r#""x = 1\ny = 2""#).unwrap();
        let many: MultilineString = serde_json::from_str(r#"["x = 1\n", "y = 2"]"#).unwrap();
        assert_eq!(one, many);
        assert_eq!(
            serde_json::to_string(&one).unwrap(),
            r#"["x = 1\n","y = 2"]"#
        );
    }

    #[test]
    fn test_bundle_text() {
        let mut data = BTreeMap::new();
        data.insert("text/plain".to_string(), serde_json::json!(["1\n", "2"]));
        data.insert("image/png".to_string(), serde_json::json!({"w": 1}));
        assert_eq!(
            IpynbOutput::bundle_text(&data, "text/plain"),
            Some("1\n2".to_string())
        );
        assert_eq!(IpynbOutput::bundle_text(&data, "image/png"), None);
        assert_eq!(IpynbOutput::bundle_text(&data, "text/html"), None);
    }

    #[test]
    fn test_cell_tag_dispatch() {
        let cell: IpynbCell = serde_json::from_str(
            r#"{"cell_type": "code", "execution_count": null, "metadata": {}, "outputs": [], "source": "1 + 1"}"#,
        )
        .unwrap();
        assert!(matches!(
            cell,
            IpynbCell::Code { execution_count: None, ref source, .. } if source.0 == "1 + 1"
        ));
    }
}
