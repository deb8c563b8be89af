//! Flags shared by every subcommand.
//!
//! Flattened into the top-level parser so `prefab -v run …` and
//! `prefab run -v …` both work.

use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Raise the log level, once per repetition.
    ///
    /// The default only shows warnings; `-v` adds progress info, `-vv`
    /// debug detail, `-vvv` traces.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "More log output (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Only errors reach the terminal.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only show errors"
    )]
    pub quiet: bool,

    /// Plain output without ANSI colour.
    ///
    /// Also triggered by the `NO_COLOR` environment variable
    /// (<https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Read configuration from this file instead of the default location.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Configuration file to use"
    )]
    pub config: Option<PathBuf>,
}
