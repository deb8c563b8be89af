//! In-memory storage provider.
//!
//! Backs tests and dry runs, and doubles as a lightweight source backend.
//! Stores are shared by name through a process-wide registry so that an
//! opaque [`StorageRef`] minted by [`MemoryStorage::create_ref`] can be
//! re-opened later by the factory — the same round-trip a remote backend
//! does with connection options, without any I/O.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, OnceLock, RwLock},
};

use serde_json::json;

use prefab_core::{
    application::{ApplicationError, StorageProvider},
    domain::{File, StorageRef, StorageType},
    error::EngineResult,
};

use super::compile_pattern;

type Store = Arc<RwLock<BTreeMap<String, Vec<u8>>>>;

// One store per name for the lifetime of the process. `create_ref` and
// `from_ref` meet here, so every provider opened from the same ref sees the
// same files.
fn registry() -> &'static Mutex<HashMap<String, Store>> {
    static REGISTRY: OnceLock<Mutex<HashMap<String, Store>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Thread-safe in-memory storage provider.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    name: String,
    initialized: bool,
    inner: Store,
}

impl MemoryStorage {
    /// Open (or create) the named store.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let inner = registry()
            .lock()
            .expect("memory storage registry poisoned")
            .entry(name.clone())
            .or_default()
            .clone();
        Self {
            name,
            initialized: false,
            inner,
        }
    }

    /// Mint an opaque ref that [`ProviderFactory`](super::ProviderFactory)
    /// can re-open.
    pub fn create_ref(name: &str) -> StorageRef {
        StorageRef::new(StorageType::Memory, json!({ "name": name }))
    }

    /// Re-open a provider from a ref minted by [`Self::create_ref`].
    pub fn from_ref(storage_ref: &StorageRef) -> EngineResult<Self> {
        let name = storage_ref.options["name"].as_str().ok_or_else(|| {
            ApplicationError::InvalidOptions {
                reason: "memory storage requires a 'name' option".into(),
            }
        })?;
        Ok(Self::named(name))
    }

    /// Read a file's content (testing helper).
    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.read().ok()?.get(path).cloned()
    }

    /// Seed a file directly (testing helper).
    pub fn insert(&self, path: &str, content: impl Into<Vec<u8>>) {
        self.inner
            .write()
            .expect("memory store lock poisoned")
            .insert(path.into(), content.into());
    }

    /// Remove all contents of this store.
    pub fn clear(&self) {
        self.inner
            .write()
            .expect("memory store lock poisoned")
            .clear();
    }

    fn read_guard(
        &self,
    ) -> EngineResult<std::sync::RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn write_guard(
        &self,
    ) -> EngineResult<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }
}

impl StorageProvider for MemoryStorage {
    fn init(&mut self) -> EngineResult<()> {
        self.initialized = true;
        Ok(())
    }

    fn list_files(&self, pattern: Option<&str>) -> EngineResult<Vec<(String, u64)>> {
        let matcher = pattern.map(compile_pattern).transpose()?;
        let files = self.read_guard()?;
        Ok(files
            .iter()
            .filter(|(path, _)| matcher.as_ref().is_none_or(|m| m.is_match(path)))
            .map(|(path, content)| (path.clone(), content.len() as u64))
            .collect())
    }

    fn file_exists(&self, path: &str) -> EngineResult<bool> {
        Ok(self.read_guard()?.contains_key(path))
    }

    fn get_file(&self, path: &str) -> EngineResult<File> {
        self.read_guard()?
            .get(path)
            .map(|content| File::new(path, content.clone()))
            .ok_or_else(|| ApplicationError::FileNotFound { path: path.into() }.into())
    }

    fn get_files(&self, pattern: &str) -> EngineResult<Vec<File>> {
        let matcher = compile_pattern(pattern)?;
        let files = self.read_guard()?;
        Ok(files
            .iter()
            .filter(|(path, _)| matcher.is_match(path))
            .map(|(path, content)| File::new(path.clone(), content.clone()))
            .collect())
    }

    fn store_file(&mut self, file: &File) -> EngineResult<()> {
        self.write_guard()?
            .insert(file.path.clone(), file.content.clone());
        Ok(())
    }

    fn store_files(&mut self, files: &[File]) -> EngineResult<()> {
        // One lock acquisition for the whole batch: atomic from the
        // caller's perspective.
        let mut guard = self.write_guard()?;
        for file in files {
            guard.insert(file.path.clone(), file.content.clone());
        }
        Ok(())
    }

    fn delete_file(&mut self, path: &str) -> EngineResult<()> {
        self.write_guard()?
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| ApplicationError::FileNotFound { path: path.into() }.into())
    }

    fn delete_files(&mut self, pattern: &str) -> EngineResult<()> {
        let matcher = compile_pattern(pattern)?;
        self.write_guard()?.retain(|path, _| !matcher.is_match(path));
        Ok(())
    }

    fn dispose(&mut self) -> EngineResult<()> {
        self.initialized = false;
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Memory
    }

    fn config(&self) -> serde_json::Value {
        json!({ "name": self.name })
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
