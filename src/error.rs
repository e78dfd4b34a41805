use std::io;

/// All error types for the act2ms3d converter.
#[derive(thiserror::Error, Debug)]
pub enum Act2Ms3dError {
    #[error("Input error: {0}")]
    Input(String),
    #[error("Invalid source model: {0}")]
    InvalidModel(String),
    #[error("String index {index} out of range (block holds {count})")]
    StringIndexOutOfRange { index: usize, count: usize },
    #[error("Output error: {0}")]
    Output(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Act2Ms3dError>;
