use std::path::PathBuf;
use thiserror::Error;

/// Input rejected before anything is sent to the audit service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Please enter a valid URL (e.g., https://example.com)")]
pub struct ValidationError {
    pub input: String,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PDF encoding failed: {0}")]
    Pdf(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid audit endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("Unknown scoring policy '{0}' (expected: standard, extended)")]
    UnknownPolicy(String),
}
