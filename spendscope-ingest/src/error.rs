use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Fatal for the current document: not a PDF, encrypted, or no text layer.
    #[error("could not read this file: {0}")]
    UnreadableDocument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
