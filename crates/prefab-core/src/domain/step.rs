//! Workspace transformation steps.
//!
//! A step is one ordered unit of work over the execution context. The
//! variants form a closed set — dispatch is an exhaustive `match` in the
//! executor, so adding a variant is a compile-checked change everywhere it
//! matters, and there is no open-ended subclassing surface.
//!
//! Steps are immutable once constructed from a template definition; they
//! read and mutate the shared execution context when run.

use super::selector::FileSelector;
use super::storage::StorageRef;

/// One ordered unit of workspace transformation.
#[derive(Debug, Clone)]
pub struct Step {
    /// Display name, used in progress notifications and diagnostics.
    pub name: String,
    pub kind: StepKind,
}

/// The closed set of step variants.
#[derive(Debug, Clone)]
pub enum StepKind {
    /// Read files matching the selector from a source backend (or, when
    /// `source` is absent, from the template's own bundled files) and
    /// upsert them into the workspace. Zero matches is not an error.
    FileSource {
        source: Option<StorageRef>,
        selector: FileSelector,
    },

    /// Re-key every matching workspace file by applying a search→replace
    /// transformation to its path. Content is untouched.
    RenameFile {
        search: String,
        replace: String,
        selector: FileSelector,
    },

    /// Parse every matching file as a YAML document and set `value` at the
    /// dotted `pointer`, creating intermediate mappings as needed.
    SetValue {
        pointer: String,
        value: serde_yaml::Value,
        selector: FileSelector,
    },

    /// Create an application on the destination platform and record the
    /// returned identifier into the context outputs under the step name.
    /// The name may reference resolved variables as `{{name}}` placeholders.
    CreateApplication { application_name: String },
}

impl Step {
    /// The definition-level tag for this step's variant.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StepKind::FileSource { .. } => "file-source",
            StepKind::RenameFile { .. } => "rename-file",
            StepKind::SetValue { .. } => "set-value",
            StepKind::CreateApplication { .. } => "create-application",
        }
    }

    /// The file selector, for variants that have one.
    pub fn selector(&self) -> Option<&FileSelector> {
        match &self.kind {
            StepKind::FileSource { selector, .. }
            | StepKind::RenameFile { selector, .. }
            | StepKind::SetValue { selector, .. } => Some(selector),
            StepKind::CreateApplication { .. } => None,
        }
    }
}
