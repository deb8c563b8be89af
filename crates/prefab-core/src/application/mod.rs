//! Application layer for Prefab.
//!
//! This layer contains:
//! - **Service**: the execution use case ([`TemplateExecutor`])
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod context;
pub mod error;
pub mod ports;
pub mod services;

// Re-export the main service and its context
pub use context::ExecutionContext;
pub use services::TemplateExecutor;

// Re-export port traits (for adapter implementation)
pub use ports::{
    ApplicationDirectory, NoopProgress, ProgressEvent, ProgressObserver, StorageFactory,
    StorageProvider,
};

pub use error::ApplicationError;
