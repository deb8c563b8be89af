//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `prefab-adapters` implement
//! these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by
//!   infrastructure
//!   - `StorageProvider`: file read/write against one backend
//!   - `StorageFactory`: opens a provider from an opaque ref
//!   - `ApplicationDirectory`: application creation on the destination platform
//!   - `ProgressObserver`: step/commit progress notifications
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by
//!   application (defined in the CLI layer)

pub mod output;

pub use output::{
    ApplicationDirectory, NoopProgress, ProgressEvent, ProgressObserver, StorageFactory,
    StorageProvider,
};
