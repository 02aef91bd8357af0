use thiserror::Error;

/// Main error type for adx operations
#[derive(Error, Debug)]
pub enum AdxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No language adapter registered for '{language}'")]
    AdapterNotFound { language: String },

    #[error("Invalid adapter registration: {0}")]
    Adapter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("File {path} exceeds maximum size limit of {limit} bytes")]
    FileTooLarge { path: String, limit: usize },
}

pub type Result<T> = std::result::Result<T, AdxError>;
