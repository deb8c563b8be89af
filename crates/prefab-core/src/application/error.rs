//! Application layer errors.
//!
//! These errors represent failures in orchestration and backend access, not
//! template logic. Template-logic errors are `DomainError` from
//! `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A storage backend operation failed.
    #[error("storage backend error during {operation}: {reason}")]
    Backend { operation: String, reason: String },

    /// A requested file is absent from the backend.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// The backend does not implement this operation.
    #[error("operation not supported by {backend} storage: {operation}")]
    NotSupported {
        backend: &'static str,
        operation: &'static str,
    },

    /// The factory was handed a ref it cannot open.
    #[error("unknown storage backend type '{storage_type}'")]
    UnknownBackend { storage_type: String },

    /// A storage ref carried options the backend cannot interpret.
    #[error("invalid storage options: {reason}")]
    InvalidOptions { reason: String },

    /// Shared store access failed (lock poisoned).
    #[error("storage state lock poisoned")]
    StoreLockError,

    /// The destination platform rejected an application-creation request.
    #[error("application creation failed for '{name}': {reason}")]
    ApplicationCreate { name: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Backend { operation, .. } => vec![
                format!("The storage backend failed during: {}", operation),
                "Check that the destination is reachable and writable".into(),
            ],
            Self::FileNotFound { path } => vec![
                format!("No file at: {}", path),
                "List the backend contents to verify the path".into(),
            ],
            Self::NotSupported { backend, operation } => vec![format!(
                "The {} backend does not implement {}",
                backend, operation
            )],
            Self::UnknownBackend { storage_type } => vec![
                format!("'{}' is not a known storage backend", storage_type),
                "Supported backends: memory, directory".into(),
            ],
            Self::InvalidOptions { reason } => vec![
                format!("Storage options rejected: {}", reason),
                "Check the storage ref in your template or flags".into(),
            ],
            Self::StoreLockError => vec![
                "Shared storage state is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::ApplicationCreate { name, .. } => vec![
                format!("Could not create application '{}'", name),
                "Check that the name is unique on the destination".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Backend { .. } | Self::StoreLockError => ErrorCategory::Internal,
            Self::FileNotFound { .. } => ErrorCategory::NotFound,
            Self::NotSupported { .. } => ErrorCategory::Internal,
            Self::UnknownBackend { .. } | Self::InvalidOptions { .. } => {
                ErrorCategory::Configuration
            }
            Self::ApplicationCreate { .. } => ErrorCategory::Validation,
        }
    }
}
