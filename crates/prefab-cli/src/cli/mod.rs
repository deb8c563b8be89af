//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "prefab",
    bin_name = "prefab",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Provision config-as-code from templates",
    long_about = "Prefab executes parameterized template bundles: it resolves \
                  input variables, runs the bundle's transformation steps, and \
                  commits the resulting files to a storage destination.",
    after_help = "EXAMPLES:\n\
        \x20 prefab run ./payments-bundle --var service=payments --dest ./out\n\
        \x20 prefab run ./bundle --var replicas=3 --dest-memory scratch --show-files\n\
        \x20 prefab inspect ./payments-bundle\n\
        \x20 prefab completions bash > /usr/share/bash-completion/completions/prefab",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute a template bundle.
    #[command(
        visible_alias = "r",
        about = "Execute a template bundle",
        after_help = "EXAMPLES:\n\
            \x20 prefab run ./bundle --var service=payments --dest ./out\n\
            \x20 prefab run ./bundle --var debug=false --dest-memory scratch\n\
            \x20 prefab run ./bundle/template.yaml --dest ./out --yes"
    )]
    Run(RunArgs),

    /// Show a bundle's metadata, variables, and steps.
    #[command(
        visible_alias = "show",
        about = "Inspect a template bundle",
        after_help = "EXAMPLES:\n\
            \x20 prefab inspect ./bundle\n\
            \x20 prefab inspect ./bundle --format json"
    )]
    Inspect(InspectArgs),

    /// Initialise a Prefab configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 prefab init           # default location\n\
            \x20 prefab init --global  # global config\n\
            \x20 prefab init --local   # local config in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 prefab completions bash > ~/.local/share/bash-completion/completions/prefab\n\
            \x20 prefab completions zsh  > ~/.zfunc/_prefab\n\
            \x20 prefab completions fish > ~/.config/fish/completions/prefab.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Prefab configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 prefab config get defaults.destination\n\
            \x20 prefab config set defaults.destination ./out\n\
            \x20 prefab config list"
    )]
    Config(ConfigCommands),
}

// ── run ───────────────────────────────────────────────────────────────────────

/// Arguments for `prefab run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Bundle directory (or path to its template.yaml).
    #[arg(value_name = "BUNDLE", help = "Template bundle to execute")]
    pub bundle: PathBuf,

    /// Template input variables, repeatable.
    ///
    /// Values are parsed as YAML scalars, so `--var debug=false` arrives as
    /// a boolean and `--var replicas=3` as a number.
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        help = "Set a template input variable (repeatable)"
    )]
    pub vars: Vec<String>,

    /// Destination directory for the committed workspace.
    #[arg(
        short = 'd',
        long = "dest",
        value_name = "DIR",
        help = "Directory destination"
    )]
    pub dest: Option<PathBuf>,

    /// Named in-memory destination (dry runs, tests).
    #[arg(
        long = "dest-memory",
        value_name = "NAME",
        conflicts_with = "dest",
        help = "In-memory destination (nothing written to disk)"
    )]
    pub dest_memory: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and execute immediately"
    )]
    pub yes: bool,

    /// List the committed files after a successful run.
    #[arg(long = "show-files", help = "List committed workspace files")]
    pub show_files: bool,
}

// ── inspect ───────────────────────────────────────────────────────────────────

/// Arguments for `prefab inspect`.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Bundle directory (or path to its template.yaml).
    #[arg(value_name = "BUNDLE", help = "Template bundle to inspect")]
    pub bundle: PathBuf,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    pub format: InspectFormat,
}

/// Output format for the `inspect` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InspectFormat {
    /// Human-readable listing.
    Text,
    /// JSON document.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `prefab init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to the global config location.
    #[arg(long = "global", help = "Create global configuration")]
    pub global: bool,

    /// Write to `.prefab.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `prefab completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `prefab config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.destination`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
