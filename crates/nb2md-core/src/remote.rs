//! Reading notebook sources from local files, S3 and HTTP(S)
//!
//! S3 objects are fetched anonymously over HTTPS through a configurable
//! endpoint template, so only publicly readable buckets (or pre-signed
//! endpoints) are reachable.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::error::{NotebookError, Result};

/// Default S3 endpoint template; `{bucket}` and `{key}` are substituted
pub const DEFAULT_S3_ENDPOINT: &str = "https://{bucket}.s3.amazonaws.com/{key}";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while fetching a remote source
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid source URI {uri}: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Options for remote reads
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    /// URL template for `s3://bucket/key` sources
    pub s3_endpoint: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            s3_endpoint: DEFAULT_S3_ENDPOINT.to_string(),
        }
    }
}

/// Where a notebook source lives, selected by URI prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Local(PathBuf),
    S3 { bucket: String, key: String },
    Http(Url),
}

impl SourceLocation {
    pub fn parse(src: &str) -> std::result::Result<Self, FetchError> {
        let invalid = |reason: &str| FetchError::InvalidUri {
            uri: src.to_string(),
            reason: reason.to_string(),
        };

        if src.starts_with("s3://") {
            let url = Url::parse(src).map_err(|e| invalid(&e.to_string()))?;
            let bucket = url
                .host_str()
                .filter(|b| !b.is_empty())
                .ok_or_else(|| invalid("missing bucket"))?
                .to_string();
            let key = url.path().trim_start_matches('/').to_string();
            if key.is_empty() {
                return Err(invalid("missing object key"));
            }
            Ok(SourceLocation::S3 { bucket, key })
        } else if src.starts_with("http://") || src.starts_with("https://") {
            let url = Url::parse(src).map_err(|e| invalid(&e.to_string()))?;
            Ok(SourceLocation::Http(url))
        } else {
            Ok(SourceLocation::Local(PathBuf::from(src)))
        }
    }
}

/// Read a notebook source into text
pub fn read_source(src: &str, options: &FetchOptions) -> Result<String> {
    match SourceLocation::parse(src)? {
        SourceLocation::Local(path) => {
            fs::read_to_string(&path).map_err(|source| NotebookError::Io { path, source })
        }
        SourceLocation::S3 { bucket, key } => {
            info!("Reading input file from S3: bucket={} key={}", bucket, key);
            let url = options
                .s3_endpoint
                .replace("{bucket}", &bucket)
                .replace("{key}", &key);
            Ok(http_get(&url, options.timeout)?)
        }
        SourceLocation::Http(url) => {
            info!("Reading input file from {}", url);
            Ok(http_get(url.as_str(), options.timeout)?)
        }
    }
}

/// Blocking HTTP GET returning the body as text
fn http_get(url: &str, timeout: Duration) -> std::result::Result<String, FetchError> {
    let request_err = |source| FetchError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(request_err)?;

    let response = client.get(url).send().map_err(request_err)?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    response.text().map_err(request_err)
}
