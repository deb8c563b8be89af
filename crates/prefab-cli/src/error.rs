//! CLI-level errors: messages, suggestions, exit codes.
//!
//! Engine errors arrive wrapped in [`CliError::Engine`]; everything else
//! here is a failure the CLI layer itself detects (bad flags, missing
//! bundles, configuration trouble). Each error knows its category, the
//! category picks the exit code, and `suggestions()` gives the user a
//! concrete next move.

use std::error::Error;
use std::fmt::Write as _;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use prefab_core::error::{EngineError, ErrorCategory as CoreCategory};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Comprehensive CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A `--var` argument that is not `KEY=VALUE`.
    #[error("Invalid variable argument '{raw}': {reason}")]
    InvalidVariable { raw: String, reason: String },

    /// No destination given and none configured.
    #[error("No destination specified")]
    DestinationRequired,

    /// The bundle path does not exist.
    #[error("Bundle not found: {path}")]
    BundleNotFound { path: PathBuf },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An unknown configuration key was requested.
    #[error("Unknown configuration key '{key}'")]
    UnknownConfigKey { key: String },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from the engine.
    ///
    /// Wrapped here so that the CLI can attach suggestions drawn from the
    /// engine error's category without touching core internals.
    #[error("Execution failed: {0}")]
    Engine(#[from] EngineError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::InvalidVariable { raw, .. } => vec![
                format!("'{}' is not a valid variable argument", raw),
                "Variables use KEY=VALUE form, e.g. --var service=payments".into(),
                "Values are parsed as YAML scalars: --var replicas=3, --var debug=false".into(),
            ],

            Self::DestinationRequired => vec![
                "Pass --dest <DIR> to commit to a directory".into(),
                "Or --dest-memory <NAME> for an in-memory dry run".into(),
                "A default can be configured: prefab config set defaults.destination ./out".into(),
            ],

            Self::BundleNotFound { path } => vec![
                format!("No bundle at: {}", path.display()),
                "A bundle is a directory with a template.yaml manifest".into(),
                "Pass the directory or the manifest file itself".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Check your config file at ~/.config/prefab/config.toml".into(),
                "Use 'prefab init' to create a default config".into(),
            ],

            Self::UnknownConfigKey { key } => vec![
                format!("'{}' is not a known configuration key", key),
                "Known keys: defaults.destination, output.no_color, output.format".into(),
            ],

            Self::Engine(engine_err) => engine_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "No changes were made".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. }
            | Self::InvalidVariable { .. }
            | Self::DestinationRequired
            | Self::Cancelled => ErrorCategory::UserError,
            Self::BundleNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } | Self::UnknownConfigKey { .. } => {
                ErrorCategory::Configuration
            }
            Self::Engine(engine) => match engine.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Render for a colour-capable terminal.
    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, true)
    }

    /// Render without ANSI codes, for piped stderr.
    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, false)
    }

    /// Shared rendering: message, optional cause chain, suggestions, and a
    /// hint about `-v` when the chain was withheld.
    fn render(&self, verbose: bool, colored: bool) -> String {
        let mut out = String::new();

        if colored {
            let _ = write!(out, "\n{} {}\n\n", "✗".red().bold(), "Error:".red().bold());
            let _ = writeln!(out, "  {}", self.to_string().red());
        } else {
            let _ = write!(out, "\nError: {self}\n");
        }

        if verbose {
            for cause in CauseChain(self.source()) {
                let text = cause.to_string();
                if colored {
                    let _ = writeln!(out, "  {} {}", "→".dimmed(), text.dimmed());
                } else {
                    let _ = writeln!(out, "  Caused by: {text}");
                }
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            if colored {
                let _ = write!(out, "\n{}\n", "Suggestions:".yellow().bold());
            } else {
                out.push_str("\nSuggestions:\n");
            }
            for suggestion in suggestions {
                let _ = writeln!(out, "  {suggestion}");
            }
        }

        if !verbose {
            let hint = "Use -v / --verbose for more details.";
            if colored {
                let _ = write!(out, "\n{} {}\n", "ℹ".blue(), hint.dimmed());
            } else {
                let _ = write!(out, "\n{hint}\n");
            }
        }

        out
    }

    /// Emit the error into the log stream at a severity matching its
    /// category.
    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::Internal | ErrorCategory::Configuration => {
                tracing::error!(error = %self, ?category, "command failed");
            }
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(error = %self, ?category, "command failed");
            }
        }
        if let Some(cause) = self.source() {
            tracing::debug!(%cause, "underlying cause");
        }
    }
}

/// Iterator over an error's `source()` chain.
struct CauseChain<'a>(Option<&'a (dyn Error + 'static)>);

impl<'a> Iterator for CauseChain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.0.take()?;
        self.0 = current.source();
        Some(current)
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}
