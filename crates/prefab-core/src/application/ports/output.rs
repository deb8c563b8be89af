//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the engine needs from external systems.
//! The `prefab-adapters` crate provides implementations.

use crate::domain::{File, StorageRef, StorageType};
use crate::error::EngineResult;

#[cfg(test)]
use mockall::automock;

/// Port for file storage against one named backend.
///
/// Implemented by:
/// - `prefab_adapters::MemoryStorage` (tests, dry runs)
/// - `prefab_adapters::DirStorage` (local directory trees)
///
/// ## Lifecycle
///
/// Callers must invoke [`init`](StorageProvider::init) exactly once before
/// any other operation — it is not guaranteed idempotent. `dispose` releases
/// the backend session and must be safe to call even when `init` partially
/// failed.
#[cfg_attr(test, automock)]
pub trait StorageProvider: Send + Sync {
    /// Establish backend connectivity/session.
    fn init(&mut self) -> EngineResult<()>;

    /// Path + size pairs for entries matching an optional glob.
    /// `None` lists everything.
    fn list_files<'a>(&self, pattern: Option<&'a str>) -> EngineResult<Vec<(String, u64)>>;

    fn file_exists(&self, path: &str) -> EngineResult<bool>;

    /// Read one file; fails with `FileNotFound` when absent.
    fn get_file(&self, path: &str) -> EngineResult<File>;

    /// Batch read of every file matching a glob.
    fn get_files(&self, pattern: &str) -> EngineResult<Vec<File>>;

    /// Upsert one file: existing paths are overwritten, new paths created.
    fn store_file(&mut self, file: &File) -> EngineResult<()>;

    /// Batch upsert. Preferred over repeated [`store_file`] calls — backends
    /// that support atomic batches must make this one write from the
    /// caller's perspective.
    fn store_files(&mut self, files: &[File]) -> EngineResult<()>;

    fn delete_file(&mut self, path: &str) -> EngineResult<()>;

    /// Delete every file matching a glob. A backend may surface
    /// `NotSupported` rather than silently doing nothing.
    fn delete_files(&mut self, pattern: &str) -> EngineResult<()>;

    /// Release backend resources/session.
    fn dispose(&mut self) -> EngineResult<()>;

    /// Backend identity, for diagnostics.
    fn storage_type(&self) -> StorageType;

    /// Backend configuration, for diagnostics.
    fn config(&self) -> serde_json::Value;
}

/// Port for opening a [`StorageProvider`] from an opaque [`StorageRef`].
///
/// Keeps the engine free of any concrete backend's construction details;
/// the CLI wires in `prefab_adapters::ProviderFactory`.
pub trait StorageFactory: Send + Sync {
    fn create(&self, storage_ref: &StorageRef) -> EngineResult<Box<dyn StorageProvider>>;
}

/// Port for the destination platform's application registry.
///
/// Used by create-application steps; a remote failure is fatal to the
/// pipeline.
pub trait ApplicationDirectory: Send + Sync {
    /// Create an application and return its identifier.
    fn create_application(&self, name: &str) -> EngineResult<String>;
}

/// Progress notifications emitted during one execution.
///
/// The engine has no process-wide logging dependency; callers subscribe as
/// needed (the CLI renders these, tests record them).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A step is about to run. `index` is zero-based.
    StepStarted {
        index: usize,
        total: usize,
        name: String,
    },
    /// The workspace is about to be pushed to the destination.
    CommitStarted { file_count: usize },
}

/// Port for observing execution progress.
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

/// Default observer: discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_event(&self, _event: &ProgressEvent) {}
}
