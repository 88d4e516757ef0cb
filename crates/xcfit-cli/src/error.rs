use crate::utils::parser::ParseError;
use std::path::PathBuf;
use thiserror::Error;
use xcfit::core::io::DatasetError;
use xcfit::engine::diagnostics::DiagnosticsError;
use xcfit::engine::error::EngineError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load '{path}': {source}", path = path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write report '{path}': {source}", path = path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: DiagnosticsError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(#[from] ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
