use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("source '{source_name}' returned no rows")]
    EmptySheet { source_name: String },

    #[error("source '{source_name}' unavailable: {details}")]
    SourceUnavailable { source_name: String, details: String },

    #[error("all configured sources failed ({attempted} attempted)")]
    AllSourcesFailed { attempted: usize },

    #[error("malformed row {row}: expected {expected} cells, got {got}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
