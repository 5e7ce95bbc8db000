use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Mail source error: {0}")]
    Source(#[from] SourceError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid {field} pattern '{pattern}': {reason}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a mail source while enumerating or reading items.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Mail profile not found at '{0}'")]
    NotFound(PathBuf),

    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to parse message '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("{0}")]
    Other(String),
}

/// A single attachment that could not be saved. Carries the name the source
/// reported, before sanitization.
#[derive(Error, Debug)]
#[error("failed to save attachment '{file_name}': {source}")]
pub struct AttachmentError {
    pub file_name: String,
    #[source]
    pub source: SourceError,
}

pub type Result<T> = std::result::Result<T, ExportError>;
