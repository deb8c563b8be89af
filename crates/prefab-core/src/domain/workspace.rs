//! In-memory file workspace accumulated during one template execution.
//!
//! A [`Workspace`] is an ordered, path-addressed set of [`File`]s. Files are
//! created by file-source steps, mutated in place by rename/set-value steps,
//! and the final set is handed to the destination storage provider at commit
//! time. A file has no identity beyond its current path and does not outlive
//! the execution that built it.
//!
//! Insertion order is preserved across upserts and renames so that commits
//! batch files in first-seen order — deterministic for tests and for backends
//! that care about write order.

use super::error::DomainError;
use super::selector::FileSelector;

/// A single workspace file: a slash-separated path plus raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub path: String,
    pub content: Vec<u8>,
}

impl File {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// View the content as UTF-8 text.
    ///
    /// Document steps require this; binary files fail with
    /// [`DomainError::NotUtf8`].
    pub fn content_str(&self) -> Result<&str, DomainError> {
        std::str::from_utf8(&self.content).map_err(|_| DomainError::NotUtf8 {
            path: self.path.clone(),
        })
    }
}

/// Ordered, path-keyed set of in-memory files.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    files: Vec<File>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    pub fn get(&self, path: &str) -> Option<&File> {
        self.files.iter().find(|f| f.path == path)
    }

    /// All files in first-seen order.
    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Insert a file, overwriting content in place when the path exists.
    ///
    /// Overwriting keeps the file's original position in the ordering.
    pub fn upsert(&mut self, file: File) {
        match self.files.iter_mut().find(|f| f.path == file.path) {
            Some(existing) => existing.content = file.content,
            None => self.files.push(file),
        }
    }

    /// Replace the content of an existing file.
    pub fn set_content(&mut self, path: &str, content: Vec<u8>) -> Result<(), DomainError> {
        let file = self
            .files
            .iter_mut()
            .find(|f| f.path == path)
            .ok_or_else(|| DomainError::FileNotInWorkspace { path: path.into() })?;
        file.content = content;
        Ok(())
    }

    /// Re-key a file under a new path, keeping content and position.
    ///
    /// Fails with [`DomainError::RenameCollision`] when `to` is already
    /// occupied by a different file.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), DomainError> {
        if from == to {
            return Ok(());
        }
        if self.contains(to) {
            return Err(DomainError::RenameCollision { path: to.into() });
        }
        let file = self
            .files
            .iter_mut()
            .find(|f| f.path == from)
            .ok_or_else(|| DomainError::FileNotInWorkspace { path: from.into() })?;
        file.path = to.into();
        Ok(())
    }

    /// Paths of all files matched by `selector`, in workspace order.
    ///
    /// Returned by value so callers can mutate the workspace while iterating.
    pub fn matching_paths(&self, selector: &FileSelector) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| selector.is_match(&f.path))
            .map(|f| f.path.clone())
            .collect()
    }
}

impl FromIterator<File> for Workspace {
    fn from_iter<I: IntoIterator<Item = File>>(iter: I) -> Self {
        let mut ws = Self::new();
        for file in iter {
            ws.upsert(file);
        }
        ws
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, content: &str) -> File {
        File::new(path, content.as_bytes().to_vec())
    }

    #[test]
    fn upsert_adds_new_files_in_order() {
        let mut ws = Workspace::new();
        ws.upsert(file("b.yaml", "b"));
        ws.upsert(file("a.yaml", "a"));

        let paths: Vec<_> = ws.files().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["b.yaml", "a.yaml"]);
    }

    #[test]
    fn upsert_overwrites_content_in_place() {
        let mut ws = Workspace::new();
        ws.upsert(file("a.yaml", "one"));
        ws.upsert(file("b.yaml", "two"));
        ws.upsert(file("a.yaml", "three"));

        assert_eq!(ws.len(), 2);
        assert_eq!(ws.get("a.yaml").unwrap().content, b"three");
        // Overwrite keeps a.yaml in first position.
        assert_eq!(ws.files()[0].path, "a.yaml");
    }

    #[test]
    fn rename_rekeys_and_preserves_content() {
        let mut ws = Workspace::new();
        ws.upsert(file("old/app.yaml", "spec: 1"));

        ws.rename("old/app.yaml", "new/app.yaml").unwrap();

        assert!(!ws.contains("old/app.yaml"));
        assert_eq!(ws.get("new/app.yaml").unwrap().content, b"spec: 1");
    }

    #[test]
    fn rename_to_occupied_path_is_a_collision() {
        let mut ws = Workspace::new();
        ws.upsert(file("a.yaml", "a"));
        ws.upsert(file("b.yaml", "b"));

        let err = ws.rename("a.yaml", "b.yaml").unwrap_err();
        assert!(matches!(err, DomainError::RenameCollision { path } if path == "b.yaml"));
    }

    #[test]
    fn rename_to_same_path_is_a_noop() {
        let mut ws = Workspace::new();
        ws.upsert(file("a.yaml", "a"));
        assert!(ws.rename("a.yaml", "a.yaml").is_ok());
        assert_eq!(ws.len(), 1);
    }

    #[test]
    fn rename_missing_file_errors() {
        let mut ws = Workspace::new();
        assert!(matches!(
            ws.rename("ghost.yaml", "x.yaml"),
            Err(DomainError::FileNotInWorkspace { .. })
        ));
    }

    #[test]
    fn content_str_rejects_invalid_utf8() {
        let f = File::new("bin.yaml", vec![0xff, 0xfe]);
        assert!(matches!(f.content_str(), Err(DomainError::NotUtf8 { .. })));
    }

    #[test]
    fn matching_paths_respects_workspace_order() {
        let mut ws = Workspace::new();
        ws.upsert(file("z/one.yaml", ""));
        ws.upsert(file("a/two.yaml", ""));
        ws.upsert(file("notes.txt", ""));

        let selector = FileSelector::default_yaml();
        assert_eq!(ws.matching_paths(&selector), vec!["z/one.yaml", "a/two.yaml"]);
    }
}
