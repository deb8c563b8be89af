use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Resolution Errors
    // ========================================================================
    /// One or more required variables have no value after default merging.
    /// All missing names are collected and reported at once.
    #[error("the following required variables were not provided: {}", names.join(", "))]
    MissingVariables { names: Vec<String> },

    #[error("duplicate variable '{name}' in template")]
    DuplicateVariable { name: String },

    // ========================================================================
    // Definition Errors
    // ========================================================================
    #[error("invalid template definition: {0}")]
    InvalidDefinition(String),

    #[error("invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ========================================================================
    // Workspace Errors
    // ========================================================================
    /// A rename step produced a path that already exists in the workspace.
    #[error("rename target '{path}' already exists in the workspace")]
    RenameCollision { path: String },

    #[error("no file at '{path}' in the workspace")]
    FileNotInWorkspace { path: String },

    // ========================================================================
    // Document Errors (value-setting steps)
    // ========================================================================
    #[error("file '{path}' is not valid UTF-8")]
    NotUtf8 { path: String },

    #[error("failed to parse document '{path}': {reason}")]
    DocumentParse { path: String, reason: String },

    #[error("cannot set '{pointer}' in '{path}': '{segment}' is not a mapping")]
    NotAMapping {
        path: String,
        pointer: String,
        segment: String,
    },

    #[error("invalid value pointer '{pointer}': {reason}")]
    InvalidPointer { pointer: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingVariables { names } => {
                let mut out = vec!["Supply the missing variables with --var NAME=VALUE:".into()];
                for name in names {
                    out.push(format!("  • --var {}=<value>", name));
                }
                out.push("Or declare a default for them in the template".into());
                out
            }
            Self::InvalidDefinition(msg) => vec![
                "Check the template manifest".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidPattern { pattern, .. } => vec![
                format!("'{}' is not a valid glob pattern", pattern),
                "Patterns use glob syntax, e.g. **/*.yaml or services/*.yaml".into(),
            ],
            Self::RenameCollision { path } => vec![
                format!("A workspace file already exists at '{}'", path),
                "Adjust the rename step's search/replace so paths stay unique".into(),
            ],
            Self::DocumentParse { path, .. } => vec![
                format!("'{}' could not be parsed as YAML", path),
                "Value-setting steps require well-formed documents".into(),
            ],
            Self::NotAMapping { pointer, .. } => vec![
                format!("The pointer '{}' traverses a scalar value", pointer),
                "Intermediate segments must be mappings (or absent)".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingVariables { .. }
            | Self::DuplicateVariable { .. }
            | Self::InvalidDefinition(_)
            | Self::InvalidPattern { .. }
            | Self::InvalidPointer { .. } => ErrorCategory::Validation,
            Self::FileNotInWorkspace { .. } => ErrorCategory::NotFound,
            Self::RenameCollision { .. }
            | Self::NotUtf8 { .. }
            | Self::DocumentParse { .. }
            | Self::NotAMapping { .. } => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
