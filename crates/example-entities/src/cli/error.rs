//! Error types for the generator binary.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::{ConfigurationError, GenerationError};

/// Errors surfaced by the generator's setup and generation flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// Settings could not be loaded.
    #[error("failed to load settings: {message}")]
    Settings {
        /// Loader error message.
        message: String,
    },
    /// The configured entity kind is not recognised.
    #[error("invalid entity kind '{value}': {message}")]
    InvalidKind {
        /// The configured value.
        value: String,
        /// Parser error message.
        message: String,
    },
    /// The tables path is not valid UTF-8 or names no file.
    #[error("tables path '{}' must be a UTF-8 file path", path.display())]
    NonUtf8Path {
        /// The configured path.
        path: PathBuf,
    },
    /// The directory holding the tables file could not be opened.
    #[error("failed to open tables directory '{}': {message}", path.display())]
    TablesDirectory {
        /// The directory path.
        path: PathBuf,
        /// I/O error message.
        message: String,
    },
    /// Registry or table configuration failed.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// An entity failed to generate.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// An entity could not be rendered as JSON.
    #[error("failed to serialise entity: {message}")]
    Serialize {
        /// Serializer error message.
        message: String,
    },
}
