//! # Dataset error variants
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("File not found error: {0}")]
    FileNotFound(String),

    #[error("Error when reading the manifest, the file may be corrupted or does not match the expected format: {0}")]
    ManifestParsingError(String),

    #[error("Manifest row is missing a required column: {0}")]
    MissingColumn(String),

    #[error("Error when loading vocabulary file, the file may be corrupted or does not match the expected format: {0}")]
    VocabularyParsingError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Cannot pad an empty list of sequences: {0}")]
    EmptySequence(String),

    #[error("Sequence shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Index out of range: {0}")]
    IndexOutOfRange(String),

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<csv::Error> for DatasetError {
    fn from(error: csv::Error) -> Self {
        DatasetError::ManifestParsingError(error.to_string())
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(error: std::io::Error) -> Self {
        DatasetError::IOError(error.to_string())
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(error: serde_json::Error) -> Self {
        DatasetError::ConfigurationError(error.to_string())
    }
}
