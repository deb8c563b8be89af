//! Storage factory: opens providers from opaque refs.

use prefab_core::{
    application::ports::{StorageFactory, StorageProvider},
    domain::{StorageRef, StorageType},
    error::EngineResult,
};

use super::{DirStorage, MemoryStorage};

/// Default `StorageFactory` covering every backend this crate ships.
///
/// The match is exhaustive over [`StorageType`], so adding a backend is a
/// compile-checked change here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn new() -> Self {
        Self
    }
}

impl StorageFactory for ProviderFactory {
    fn create(&self, storage_ref: &StorageRef) -> EngineResult<Box<dyn StorageProvider>> {
        Ok(match storage_ref.storage_type {
            StorageType::Memory => Box::new(MemoryStorage::from_ref(storage_ref)?),
            StorageType::Directory => Box::new(DirStorage::from_ref(storage_ref)?),
        })
    }
}
