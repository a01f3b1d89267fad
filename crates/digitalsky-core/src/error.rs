use thiserror::Error;

/// Application-wide error types for DigitalSky.
#[derive(Error, Debug)]
pub enum AppError {
    /// No application exists with the requested id.
    #[error("Application not found: {0}")]
    ApplicationNotFound(String),

    /// The application has left the draft state and can no longer be edited.
    #[error("Application {0} is not editable")]
    NotEditable(String),

    /// The caller does not own the application and is not an administrator.
    #[error("Unauthorized access: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Writing to document storage failed.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A stored document could not be found.
    #[error("Document not found: {0}")]
    StorageFileNotFound(String),

    /// Reading an uploaded file or request part failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The request payload could not be parsed.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Field validation failed.
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if the error describes a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ApplicationNotFound(_) | AppError::StorageFileNotFound(_)
        )
    }

    /// Returns true if the error was caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::ApplicationNotFound(_)
                | AppError::StorageFileNotFound(_)
                | AppError::NotEditable(_)
                | AppError::Unauthorized(_)
                | AppError::Forbidden(_)
                | AppError::IoError(_)
                | AppError::MalformedPayload(_)
                | AppError::ValidationError(_)
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}
