//! Configuration file support for nb2md CLI
//!
//! Loads settings from `_nb2md.toml` configuration file.

use anyhow::{Context, Result};
use nb2md_core::Format;
use nb2md_core::remote::{DEFAULT_S3_ENDPOINT, DEFAULT_TIMEOUT_SECS, FetchOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "_nb2md.toml";

/// Schema file referenced by the `#:schema` directive of generated configs
pub const SCHEMA_FILE_NAME: &str = "nb2md.schema.json";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Output configuration
    #[serde(skip_serializing_if = "OutputConfig::is_empty")]
    pub output: OutputConfig,
    /// Remote source configuration
    #[serde(skip_serializing_if = "FetchConfig::is_empty")]
    pub fetch: FetchConfig,
    /// Commit and push configuration
    #[serde(skip_serializing_if = "PushConfig::is_empty")]
    pub push: PushConfig,
}

/// Output configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Target format when the destination is "auto": "md" (Markdown) or "ipynb" (Jupyter)
    /// (default: "md")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Destination pathname, or "auto" to name the output after the notebook (default: "auto")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst: Option<String>,
}

impl OutputConfig {
    fn is_empty(&self) -> bool {
        self.format.is_none() && self.dst.is_none()
    }
}

/// Remote source configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds (default: 30)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// URL template for s3:// sources. Use {bucket} and {key} as placeholders.
    /// (default: "https://{bucket}.s3.amazonaws.com/{key}")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_endpoint: Option<String>,
}

impl FetchConfig {
    fn is_empty(&self) -> bool {
        self.timeout_secs.is_none() && self.s3_endpoint.is_none()
    }
}

/// Commit and push configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct PushConfig {
    /// Remote passed to `git push` (default: the branch's upstream)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

impl PushConfig {
    fn is_empty(&self) -> bool {
        self.remote.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `_nb2md.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Target format configured for automatic destinations
    pub fn target_format(&self) -> Result<Option<Format>> {
        self.output
            .format
            .as_deref()
            .map(|f| {
                f.parse::<Format>()
                    .with_context(|| format!("Invalid output.format in config: {}", f))
            })
            .transpose()
    }

    /// Fetch options with configured overrides applied
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.fetch.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            s3_endpoint: self
                .fetch
                .s3_endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_S3_ENDPOINT.to_string()),
        }
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string with schema directive
    pub fn to_toml_with_schema(&self) -> Result<String> {
        let toml_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        Ok(format!("#:schema ./{}\n\n{}", SCHEMA_FILE_NAME, toml_content))
    }

    /// Create a sample configuration with common defaults for init command
    pub fn sample() -> Self {
        Config {
            output: OutputConfig {
                format: Some("md".to_string()),
                dst: Some("auto".to_string()),
            },
            fetch: FetchConfig {
                timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
                s3_endpoint: Some(DEFAULT_S3_ENDPOINT.to_string()),
            },
            push: PushConfig {
                remote: None, // upstream of the current branch
            },
        }
    }
}
