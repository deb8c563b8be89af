//! Backend identity and opaque provider references.
//!
//! The engine never depends on a concrete storage backend. It carries a
//! [`StorageRef`] — a backend type tag plus backend-specific options — and
//! hands it to the injected factory when a provider is actually needed.
//! Each concrete backend exposes a `create_ref` constructor producing refs
//! it knows how to open.

use serde::{Deserialize, Serialize};

/// Identity tag for the storage backends the factory can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageType {
    /// Process-local, in-memory store (tests, dry runs).
    Memory,
    /// A directory tree on the local filesystem.
    Directory,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// Opaque descriptor for "where to read/write".
///
/// `options` is backend-specific JSON; only the backend that minted the ref
/// interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageRef {
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    #[serde(default)]
    pub options: serde_json::Value,
}

impl StorageRef {
    pub fn new(storage_type: StorageType, options: serde_json::Value) -> Self {
        Self {
            storage_type,
            options,
        }
    }
}
