//! Error types for filedb.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the store.
#[derive(Error, Debug)]
pub enum Error {
    /// Collection name was empty.
    #[error("Missing collection - {0}")]
    MissingCollection(&'static str),

    /// Resource name was empty.
    #[error("Missing resource - {0}")]
    MissingResource(&'static str),

    /// Name would address a path outside its parent (`..`, absolute path).
    #[error("Invalid name '{0}' - must stay inside the store")]
    InvalidName(String),

    /// Neither the bare path nor the extension-qualified path exists.
    #[error("Unable to find file or directory named {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded, or bytes could not be decoded.
    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

impl Error {
    /// True for resolution failures, i.e. the record or collection is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Result type alias for filedb operations.
pub type Result<T> = std::result::Result<T, Error>;
