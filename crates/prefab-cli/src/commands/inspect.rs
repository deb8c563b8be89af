//! Implementation of the `prefab inspect` command.
//!
//! Shows what a bundle declares — metadata, variables, steps — without
//! executing anything.

use serde_json::json;
use tracing::instrument;

use prefab_adapters::load_bundle;
use prefab_core::domain::{StepKind, Template};

use crate::{
    cli::{InspectArgs, InspectFormat, global::GlobalArgs},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `prefab inspect` command.
#[instrument(skip_all, fields(bundle = %args.bundle.display()))]
pub fn execute(args: InspectArgs, _global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    if !args.bundle.exists() {
        return Err(CliError::BundleNotFound {
            path: args.bundle.clone(),
        });
    }
    let template = load_bundle(&args.bundle)?;

    match args.format {
        InspectFormat::Text => print_text(&template, &output),
        InspectFormat::Json => print_json(&template),
    }
}

fn print_text(template: &Template, out: &OutputManager) -> CliResult<()> {
    out.header(&format!("Template '{}'", template.name))?;
    if let Some(description) = &template.description {
        out.print(&format!("  {description}"))?;
    }
    if let Some(version) = &template.template_version {
        out.print(&format!("  Version: {version}"))?;
    }
    if let Some(author) = &template.author {
        out.print(&format!("  Author:  {author}"))?;
    }
    if let Some(parent) = &template.parent {
        out.print(&format!("  Parent:  {}", parent.source))?;
    }
    out.print(&format!("  Bundled files: {}", template.source_files.len()))?;

    out.print("")?;
    out.header("Variables")?;
    if template.variables.is_empty() {
        out.print("  (none)")?;
    }
    for variable in &template.variables {
        let mut line = format!("  • {} ({})", variable.name, variable.kind);
        if variable.required {
            line.push_str(" [required]");
        }
        if let Some(default) = &variable.default {
            line.push_str(&format!(" default={default}"));
        }
        out.print(&line)?;
    }

    out.print("")?;
    out.header("Steps")?;
    if template.steps.is_empty() {
        out.print("  (none)")?;
    }
    for (index, step) in template.steps.iter().enumerate() {
        out.print(&format!(
            "  {}. {} [{}]{}",
            index + 1,
            step.name,
            step.kind_name(),
            describe(step)
        ))?;
    }

    Ok(())
}

/// Variant-specific detail suffix for the step listing.
fn describe(step: &prefab_core::domain::Step) -> String {
    let patterns = step
        .selector()
        .map(|s| format!(" files={}", s.patterns().join(",")))
        .unwrap_or_default();

    match &step.kind {
        StepKind::FileSource { source, .. } => match source {
            Some(storage_ref) => format!(" source={}{patterns}", storage_ref.storage_type),
            None => format!(" source=bundle{patterns}"),
        },
        StepKind::RenameFile {
            search, replace, ..
        } => format!(" '{search}' → '{replace}'{patterns}"),
        StepKind::SetValue { pointer, value, .. } => {
            let rendered = serde_yaml::to_string(value)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default();
            format!(" {pointer}={rendered}{patterns}")
        }
        StepKind::CreateApplication { application_name } => {
            format!(" application={application_name}")
        }
    }
}

fn print_json(template: &Template) -> CliResult<()> {
    let variables: Vec<_> = template
        .variables
        .iter()
        .map(|v| {
            json!({
                "name": v.name,
                "type": v.kind.to_string(),
                "required": v.required,
                "default": v.default,
            })
        })
        .collect();

    let steps: Vec<_> = template
        .steps
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "type": s.kind_name(),
                "files": s.selector().map(|sel| sel.patterns().to_vec()),
            })
        })
        .collect();

    let report = json!({
        "name": template.name,
        "description": template.description,
        "template_version": template.template_version,
        "schema_version": template.schema_version,
        "author": template.author,
        "source_files": template.source_files.len(),
        "variables": variables,
        "steps": steps,
    });

    let rendered = serde_json::to_string_pretty(&report).map_err(|e| CliError::InvalidInput {
        message: format!("failed to render JSON: {e}"),
    })?;
    // JSON goes to stdout unconditionally; it is the machine-readable
    // output, not a progress message.
    println!("{rendered}");
    Ok(())
}
