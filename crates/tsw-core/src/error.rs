use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither `swagger: "2.0"` nor `openapi: 3.x`.
    #[error("not supported: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("no spec source provided (pass SRC or set `src` in the config)")]
    MissingSource,
}
