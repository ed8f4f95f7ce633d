//! Error types for ramlsync

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// ramlsync errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Contract parse error: {0}")]
    ContractParse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Rule error: {0}")]
    Rule(String),

    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
