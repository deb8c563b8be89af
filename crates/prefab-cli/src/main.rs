//! `prefab` binary entry point.
//!
//! Startup is deliberately linear: arguments, then logging, then
//! configuration, then the command itself. Failures before dispatch print
//! straight to stderr because the output manager may not exist yet;
//! failures after dispatch go through [`report_failure`], the one place
//! structured errors become messages and exit codes.
//!
//! Exit codes: 0 success, 1 internal, 2 bad input, 3 not found,
//! 4 configuration.

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // .env first so both logging and configuration can see it. A missing
    // file is fine; deployments use real environment variables.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(parsed) => parsed,
        Err(parse_err) => {
            // clap already formatted this nicely, including --help/--version.
            eprintln!("{}", parse_err.render().ansi());
            return ExitCode::from(2);
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("could not set up logging: {e}");
        return ExitCode::from(1);
    }
    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        "starting"
    );

    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("configuration load failed: {e:#}");
            return ExitCode::from(4);
        }
    };

    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;

    match dispatch(cli, config, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(err, verbose),
    }
}

/// Hand the parsed command to its handler.
#[instrument(skip_all)]
fn dispatch(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::Run(cmd) => commands::run::execute(cmd, cli.global, config, output),
        Commands::Inspect(cmd) => commands::inspect::execute(cmd, cli.global, output),
        Commands::Init(cmd) => commands::init::execute(cmd, cli.global, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, cli.global, output),
    }
}

/// Render a failure and pick the exit code.
///
/// Errors are the one kind of output that must survive `--quiet` and
/// redirection, so this writes to stderr directly; colour only when stderr
/// is a terminal.
fn report_failure(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    if std::io::stderr().is_terminal() {
        eprint!("{}", err.format_colored(verbose));
    } else {
        eprint!("{}", err.format_plain(verbose));
    }

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
