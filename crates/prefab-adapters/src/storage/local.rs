//! Local-directory storage provider using std::fs.
//!
//! Treats one directory tree as the backend: paths are relative,
//! slash-separated, and files are raw bytes. Used as the destination for
//! local provisioning runs and as a source backend for shared file trees.

use std::{
    io,
    path::{Path, PathBuf},
};

use serde_json::json;
use tracing::debug;
use walkdir::WalkDir;

use prefab_core::{
    application::{ApplicationError, StorageProvider},
    domain::{File, StorageRef, StorageType},
    error::{EngineError, EngineResult},
};

use super::compile_pattern;

/// Storage provider rooted at a local directory.
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Mint an opaque ref that [`ProviderFactory`](super::ProviderFactory)
    /// can re-open.
    pub fn create_ref(root: &Path) -> StorageRef {
        StorageRef::new(
            StorageType::Directory,
            json!({ "root": root.to_string_lossy() }),
        )
    }

    /// Re-open a provider from a ref minted by [`Self::create_ref`].
    pub fn from_ref(storage_ref: &StorageRef) -> EngineResult<Self> {
        let root = storage_ref.options["root"].as_str().ok_or_else(|| {
            ApplicationError::InvalidOptions {
                reason: "directory storage requires a 'root' option".into(),
            }
        })?;
        Ok(Self::new(root))
    }

    /// Every file under the root as a slash-separated relative path.
    fn walk(&self) -> EngineResult<Vec<String>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = entry.map_err(|e| backend_error("list", &self.root, e))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| backend_error("list", entry.path(), e))?;
            paths.push(normalize_path(&rel.to_string_lossy()));
        }
        paths.sort();
        Ok(paths)
    }

    fn absolute(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl StorageProvider for DirStorage {
    fn init(&mut self) -> EngineResult<()> {
        // Session setup for a directory backend is just making sure the
        // root exists.
        std::fs::create_dir_all(&self.root)
            .map_err(|e| map_io_error(&self.root, e, "create root directory"))?;
        debug!(root = %self.root.display(), "directory storage initialised");
        Ok(())
    }

    fn list_files(&self, pattern: Option<&str>) -> EngineResult<Vec<(String, u64)>> {
        let matcher = pattern.map(compile_pattern).transpose()?;
        let mut listing = Vec::new();
        for path in self.walk()? {
            if matcher.as_ref().is_none_or(|m| m.is_match(&path)) {
                let metadata = std::fs::metadata(self.absolute(&path))
                    .map_err(|e| map_io_error(&self.absolute(&path), e, "stat file"))?;
                listing.push((path, metadata.len()));
            }
        }
        Ok(listing)
    }

    fn file_exists(&self, path: &str) -> EngineResult<bool> {
        Ok(self.absolute(path).is_file())
    }

    fn get_file(&self, path: &str) -> EngineResult<File> {
        let absolute = self.absolute(path);
        if !absolute.is_file() {
            return Err(ApplicationError::FileNotFound { path: path.into() }.into());
        }
        let content =
            std::fs::read(&absolute).map_err(|e| map_io_error(&absolute, e, "read file"))?;
        Ok(File::new(path, content))
    }

    fn get_files(&self, pattern: &str) -> EngineResult<Vec<File>> {
        let matcher = compile_pattern(pattern)?;
        let mut files = Vec::new();
        for path in self.walk()? {
            if matcher.is_match(&path) {
                files.push(self.get_file(&path)?);
            }
        }
        Ok(files)
    }

    fn store_file(&mut self, file: &File) -> EngineResult<()> {
        let absolute = self.absolute(&file.path);
        if let Some(parent) = absolute.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| map_io_error(parent, e, "create directory"))?;
        }
        std::fs::write(&absolute, &file.content)
            .map_err(|e| map_io_error(&absolute, e, "write file"))
    }

    fn store_files(&mut self, files: &[File]) -> EngineResult<()> {
        for file in files {
            self.store_file(file)?;
        }
        Ok(())
    }

    fn delete_file(&mut self, path: &str) -> EngineResult<()> {
        let absolute = self.absolute(path);
        if !absolute.is_file() {
            return Err(ApplicationError::FileNotFound { path: path.into() }.into());
        }
        std::fs::remove_file(&absolute).map_err(|e| map_io_error(&absolute, e, "delete file"))
    }

    fn delete_files(&mut self, _pattern: &str) -> EngineResult<()> {
        // Bulk deletion against a directory tree is deliberately not
        // offered; surfacing the gap beats a silent no-op.
        Err(ApplicationError::NotSupported {
            backend: "directory",
            operation: "delete_files",
        }
        .into())
    }

    fn dispose(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Directory
    }

    fn config(&self) -> serde_json::Value {
        json!({ "root": self.root.to_string_lossy() })
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> EngineError {
    ApplicationError::Backend {
        operation: operation.into(),
        reason: format!("{}: {}", path.display(), e),
    }
    .into()
}

fn backend_error(operation: &str, path: &Path, e: impl std::fmt::Display) -> EngineError {
    ApplicationError::Backend {
        operation: operation.into(),
        reason: format!("{}: {}", path.display(), e),
    }
    .into()
}

/// Normalise a filesystem path to forward slashes so Windows and Unix paths
/// compare identically throughout the engine.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

// ── tests ─────────────────────────────────────────────────────────────────────
