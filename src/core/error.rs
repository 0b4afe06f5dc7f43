use thiserror::Error;

/// Error reported by the table service itself, identified by its error code
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct StoreError {
    /// Short error code, e.g. `ResourceInUseException`
    pub code: String,
    pub message: String,
}

impl StoreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The table (or index) being created already exists
    pub fn is_resource_in_use(&self) -> bool {
        self.code == "ResourceInUseException"
    }

    pub fn is_resource_not_found(&self) -> bool {
        self.code == "ResourceNotFoundException"
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Table store error: {0}")]
    Store(#[from] StoreError),

    /// Failure before the service answered (dispatch, timeout, bad response)
    #[error("SDK error: {0}")]
    Sdk(String),

    #[error("Request build error: {0}")]
    Build(#[from] aws_sdk_dynamodb::error::BuildError),

    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when the service says the table already exists
    pub fn is_resource_in_use(&self) -> bool {
        matches!(self, AppError::Store(e) if e.is_resource_in_use())
    }

    pub fn is_resource_not_found(&self) -> bool {
        matches!(self, AppError::Store(e) if e.is_resource_not_found())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
