use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A required argument was absent. This is a caller contract violation
    /// and aborts the generation pass.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CoreError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
