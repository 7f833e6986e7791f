use thiserror::Error;

use crate::types::Id;

/// Core error type shared by the host model and the fake data layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A target that the operation requires does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of the missing entity (item, template, destination, ...)
        entity: String,
        /// Identifier or path of the missing entity
        id: String,
    },

    /// An identifier was added twice
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// A required input was null, empty or otherwise unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An item references a template that is not registered
    #[error("Template not found: {0}")]
    TemplateNotFound(Id),

    /// No command is installed for the requested operation
    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl CoreError {
    /// Helper to create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Helper to create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CoreError::InvalidArgument(message.into())
    }

    /// Whether this error signals a missing entity
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}

/// Result alias used across the workspace
pub type CoreResult<T> = Result<T, CoreError>;

/// Fails with `InvalidArgument` when `value` is empty or whitespace.
pub fn ensure_not_empty(value: &str, argument: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::invalid_argument(format!(
            "{} cannot be null or empty",
            argument
        )));
    }
    Ok(())
}
