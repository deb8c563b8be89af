//! Prefab Core - Template Execution Engine
//!
//! This crate provides the domain and application layers for the Prefab
//! provisioning tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           prefab-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Service            │
//! │           (TemplateExecutor)            │
//! │   resolve vars → run steps → commit     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (StorageProvider, StorageFactory,       │
//! │  ApplicationDirectory, ProgressObserver)│
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    prefab-adapters (Infrastructure)     │
//! │ (MemoryStorage, DirStorage, factory)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (Variable, Workspace, Step, Template)  │
//! │        No I/O, no backends              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prefab_core::{
//!     application::TemplateExecutor,
//!     domain::{Template, VarMap},
//! };
//!
//! // 1. Build a template from a declarative definition
//! let template = Template::from_definition(definition, source_files).unwrap();
//!
//! // 2. Execute it (with injected adapters)
//! let executor = TemplateExecutor::new(storage_factory, application_directory);
//! let context = executor.execute(&template, &inputs, &destination).unwrap();
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ExecutionContext, TemplateExecutor,
        ports::{
            ApplicationDirectory, NoopProgress, ProgressEvent, ProgressObserver, StorageFactory,
            StorageProvider,
        },
    };
    pub use crate::domain::{
        File, FileSelector, Step, StepKind, StorageRef, StorageType, Template,
        TemplateDefinition, VarMap, Variable, VariableKind, Workspace,
    };
    pub use crate::error::{EngineError, EngineResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
