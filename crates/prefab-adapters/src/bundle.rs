//! Filesystem-based template bundle loader.
//!
//! Discovers and parses a bundle directory into a domain [`Template`]
//! ready for execution.
//!
//! # Directory layout expected
//!
//! ```text
//! payments-service/
//! ├── template.yaml            ← manifest (required)
//! └── files/                   ← bundled source files (optional)
//!     └── skeleton/
//!         ├── app.yaml
//!         └── pipeline.yaml
//! ```
//!
//! The manifest format is documented on
//! [`TemplateDefinition`](prefab_core::domain::TemplateDefinition).
//! Everything under `files/` becomes the template's `source_files`, keyed
//! by its slash-separated path relative to `files/`.
//!
//! [`load_bundle`] also accepts the path of the manifest itself; the bundle
//! root is then its parent directory.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use prefab_core::{
    domain::{DomainError, File, Template, TemplateDefinition},
    error::EngineResult,
};

/// Manifest file name expected at the bundle root.
pub const MANIFEST_NAME: &str = "template.yaml";

/// Directory holding the bundle's source files.
pub const FILES_DIR: &str = "files";

/// Load a template bundle from `path` (a bundle directory or a manifest
/// file).
///
/// # Errors
///
/// Returns [`DomainError::InvalidDefinition`] when the manifest is missing
/// or unparseable, or any bundled file cannot be read. Unlike a directory
/// of independent templates, a bundle is one unit — nothing is skipped.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_bundle(path: &Path) -> EngineResult<Template> {
    let (root, manifest_path) = resolve_layout(path)?;

    let raw = std::fs::read_to_string(&manifest_path).map_err(|e| {
        DomainError::InvalidDefinition(format!(
            "failed to read '{}': {e}",
            manifest_path.display()
        ))
    })?;

    let definition: TemplateDefinition = serde_yaml::from_str(&raw).map_err(|e| {
        DomainError::InvalidDefinition(format!(
            "failed to parse '{}': {e}",
            manifest_path.display()
        ))
    })?;

    let source_files = load_source_files(&root.join(FILES_DIR))?;
    debug!(
        template = %definition.name,
        files = source_files.len(),
        "bundle loaded"
    );

    Ok(Template::from_definition(definition, source_files)?)
}

/// Work out the bundle root and manifest location from the given path.
fn resolve_layout(path: &Path) -> Result<(PathBuf, PathBuf), DomainError> {
    if path.is_dir() {
        let manifest = path.join(MANIFEST_NAME);
        if !manifest.is_file() {
            return Err(DomainError::InvalidDefinition(format!(
                "missing {} in '{}'",
                MANIFEST_NAME,
                path.display()
            )));
        }
        return Ok((path.to_path_buf(), manifest));
    }

    if path.is_file() {
        let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        return Ok((root, path.to_path_buf()));
    }

    Err(DomainError::InvalidDefinition(format!(
        "bundle not found: '{}'",
        path.display()
    )))
}

/// Read every file under `files/` (absent directory ⇒ empty set).
fn load_source_files(files_dir: &Path) -> Result<Vec<File>, DomainError> {
    if !files_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(files_dir).min_depth(1).sort_by_file_name() {
        let entry = entry
            .map_err(|e| DomainError::InvalidDefinition(format!("bundle walk error: {e}")))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(files_dir).map_err(|_| {
            DomainError::InvalidDefinition(format!(
                "failed to relativise '{}' against '{}'",
                entry.path().display(),
                files_dir.display()
            ))
        })?;
        let content = std::fs::read(entry.path()).map_err(|e| {
            DomainError::InvalidDefinition(format!(
                "failed to read bundled file '{}': {e}",
                entry.path().display()
            ))
        })?;
        files.push(File::new(normalize_path(&rel.to_string_lossy()), content));
    }
    Ok(files)
}

/// Normalise a filesystem path to forward slashes so Windows and Unix paths
/// compare identically throughout the engine.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
