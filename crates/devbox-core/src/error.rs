use thiserror::Error;

/// Core error types for devbox model operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid name: {0}")]
    InvalidName(String),
}

impl CoreError {
    /// Create a new InvalidName error
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName(name.into())
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
