//! Implementation of the `prefab run` command.
//!
//! Responsibility: translate CLI arguments into engine inputs, call the
//! template executor with the real adapters, and display results. No
//! engine logic lives here.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument};

use prefab_adapters::{
    DirStorage, LocalApplicationDirectory, MemoryStorage, ProviderFactory, TracingProgress,
    load_bundle,
};
use prefab_core::{
    application::{ExecutionContext, ProgressEvent, ProgressObserver, TemplateExecutor},
    domain::{StorageRef, Template, VarMap},
};

use crate::{
    cli::{RunArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `prefab run` command.
///
/// Dispatch sequence:
/// 1. Load the bundle into a template
/// 2. Parse `--var` arguments into an input map
/// 3. Resolve the destination (flags, then configured default)
/// 4. Confirm with user unless `--yes` or `--quiet`
/// 5. Execute via `TemplateExecutor` with progress rendering
/// 6. Print outputs and committed files
#[instrument(skip_all, fields(bundle = %args.bundle.display()))]
pub fn execute(
    args: RunArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Load the bundle
    if !args.bundle.exists() {
        return Err(CliError::BundleNotFound {
            path: args.bundle.clone(),
        });
    }
    let template = load_bundle(&args.bundle)?;
    debug!(template = %template.name, steps = template.steps.len(), "bundle loaded");

    // 2. Parse input variables
    let inputs = parse_vars(&args.vars)?;

    // 3. Resolve destination
    let destination = resolve_destination(&args, &config)?;

    // 4. Show configuration and confirm
    if !global.quiet && !args.yes {
        show_configuration(&template, &inputs, &destination, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    // 5. Execute
    let progress = make_progress(&global, template.steps.len());
    // Without a bar (quiet mode, zero steps) progress still lands in the
    // log stream.
    let observer: Box<dyn ProgressObserver> = match &progress {
        Some(bar) => Box::new(ProgressHandle(bar.clone())),
        None => Box::new(TracingProgress),
    };
    let executor = TemplateExecutor::new(
        Box::new(ProviderFactory::new()),
        Box::new(LocalApplicationDirectory::new()),
    )
    .with_progress(observer);

    output.header(&format!("Executing '{}'...", template.name))?;
    info!(template = %template.name, "execution started");

    let result = executor.execute(&template, &inputs, &destination);
    if let Some(bar) = progress.as_ref() {
        bar.finish_and_clear();
    }
    let context = result?;

    info!(template = %template.name, "execution completed");

    // 6. Success + results
    report(&context, &args, &output)?;
    Ok(())
}

// ── Variable parsing ──────────────────────────────────────────────────────────

/// Parse repeated `KEY=VALUE` arguments into the engine's input map.
///
/// Values are parsed as YAML scalars so `false`, `3`, and `hello` arrive as
/// boolean, number, and string respectively. Anything that fails scalar
/// parsing is taken verbatim as a string.
pub fn parse_vars(raw_vars: &[String]) -> CliResult<VarMap> {
    let mut inputs = VarMap::new();
    for raw in raw_vars {
        let (key, value) = raw.split_once('=').ok_or_else(|| CliError::InvalidVariable {
            raw: raw.clone(),
            reason: "missing '='".into(),
        })?;
        if key.is_empty() {
            return Err(CliError::InvalidVariable {
                raw: raw.clone(),
                reason: "empty key".into(),
            });
        }
        inputs.insert(key.to_string(), parse_scalar(value));
    }
    Ok(inputs)
}

fn parse_scalar(value: &str) -> serde_json::Value {
    if value.is_empty() {
        // An explicit empty value means the empty string, not YAML null.
        return serde_json::Value::String(String::new());
    }
    serde_yaml::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()))
}

// ── Destination resolution ────────────────────────────────────────────────────

fn resolve_destination(args: &RunArgs, config: &AppConfig) -> CliResult<StorageRef> {
    if let Some(dir) = &args.dest {
        return Ok(DirStorage::create_ref(dir));
    }
    if let Some(name) = &args.dest_memory {
        return Ok(MemoryStorage::create_ref(name));
    }
    if let Some(dir) = &config.defaults.destination {
        return Ok(DirStorage::create_ref(dir));
    }
    Err(CliError::DestinationRequired)
}

// ── Progress rendering ────────────────────────────────────────────────────────

/// Observer bridging engine progress events onto an indicatif bar.
struct ProgressHandle(Arc<ProgressBar>);

impl ProgressObserver for ProgressHandle {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::StepStarted { index, total, name } => {
                self.0.set_position(*index as u64);
                self.0.set_message(format!("step {}/{}: {}", index + 1, total, name));
            }
            ProgressEvent::CommitStarted { file_count } => {
                self.0
                    .set_message(format!("pushing {file_count} file(s) to destination"));
            }
        }
    }
}

fn make_progress(global: &GlobalArgs, steps: usize) -> Option<Arc<ProgressBar>> {
    if global.quiet || steps == 0 {
        return None;
    }
    let bar = ProgressBar::new(steps as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:24} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    Some(Arc::new(bar))
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    template: &Template,
    inputs: &VarMap,
    destination: &StorageRef,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Execution plan")?;
    out.print(&format!("  Template:     {}", template.name))?;
    if let Some(description) = &template.description {
        out.print(&format!("  Description:  {description}"))?;
    }
    out.print(&format!("  Steps:        {}", template.steps.len()))?;
    out.print(&format!(
        "  Destination:  {} ({})",
        destination.storage_type,
        destination
            .options
            .as_object()
            .and_then(|o| o.values().next())
            .and_then(|v| v.as_str())
            .unwrap_or("-")
    ))?;
    if !inputs.is_empty() {
        out.print("  Variables:")?;
        for (key, value) in inputs {
            out.print(&format!("    {key} = {value}"))?;
        }
    }
    out.print("")?;
    Ok(())
}

fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

fn report(context: &ExecutionContext, args: &RunArgs, out: &OutputManager) -> CliResult<()> {
    if context.workspace.is_empty() {
        out.warning("No files produced; nothing was committed")?;
    } else {
        out.success(&format!(
            "Committed {} file(s) to the destination",
            context.workspace.len()
        ))?;
    }

    if !context.outputs.is_empty() {
        out.print("")?;
        out.print("Outputs:")?;
        for (key, value) in &context.outputs {
            out.print(&format!("  {key} = {value}"))?;
        }
    }

    if args.show_files {
        out.print("")?;
        out.print("Files:")?;
        for file in context.workspace.files() {
            out.print(&format!("  {} ({} bytes)", file.path, file.content.len()))?;
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
