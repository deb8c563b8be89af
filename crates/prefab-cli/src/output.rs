//! Terminal output for command handlers.
//!
//! Commands never write to stdout directly; everything user-facing goes
//! through [`OutputManager`] so quiet mode and colour handling live in one
//! place. Diagnostics take the other channel entirely: `tracing` events on
//! stderr (see `logging.rs`).

use std::io;

use console::Term;
use owo_colors::OwoColorize;

use crate::cli::global::GlobalArgs;
use crate::config::AppConfig;

/// Visual weight of a line.
#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Success,
    Warning,
    Heading,
}

/// Writes user-facing lines to stdout, honouring `--quiet` and colour
/// settings resolved at startup.
pub struct OutputManager {
    term: Term,
    quiet: bool,
    color: bool,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        Self {
            term: Term::stdout(),
            quiet: args.quiet,
            color: !(args.no_color || config.output.no_color),
        }
    }

    /// Unadorned line.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.write(Tone::Plain, msg)
    }

    /// `✓`-stamped line for completed work.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.write(Tone::Success, msg)
    }

    /// `⚠`-stamped line for conditions worth seeing but not fatal.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.write(Tone::Warning, msg)
    }

    /// Section heading.
    pub fn header(&self, msg: &str) -> io::Result<()> {
        self.write(Tone::Heading, msg)
    }

    fn write(&self, tone: Tone, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(&stamp(tone, self.color, msg))
    }
}

/// Build the final line for a message: stamp, colour, text.
fn stamp(tone: Tone, color: bool, msg: &str) -> String {
    match (tone, color) {
        (Tone::Plain, _) => msg.to_owned(),
        (Tone::Heading, false) => msg.to_owned(),
        (Tone::Heading, true) => msg.cyan().bold().to_string(),
        (Tone::Success, false) => format!("\u{2713} {msg}"),
        (Tone::Success, true) => format!("{} {}", "\u{2713}".green().bold(), msg.green()),
        (Tone::Warning, false) => format!("\u{26a0} {msg}"),
        (Tone::Warning, true) => format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow()),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
