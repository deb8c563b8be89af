//! Template Executor - main application orchestrator.
//!
//! This service coordinates one template execution:
//! 1. Resolve input variables against declared defaults and required-ness
//! 2. Run each step strictly in declared order against a private context
//! 3. Commit the resulting workspace to the destination storage provider
//!
//! It implements the driving port (incoming) and uses driven ports
//! (outgoing): the storage factory, the application directory, and the
//! progress observer.
//!
//! ## Failure model
//!
//! Resolution failures surface before any step runs. A step failure aborts
//! the remaining pipeline and propagates unchanged; workspace mutations
//! already applied by earlier steps are **not** rolled back. Commit acquires
//! the destination provider for the duration of the push only and releases
//! it unconditionally, even when the batch write fails.

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        context::ExecutionContext,
        ports::{
            ApplicationDirectory, NoopProgress, ProgressEvent, ProgressObserver, StorageFactory,
            StorageProvider,
        },
    },
    domain::{
        self, File, FileSelector, StepKind, StorageRef, Template, VarMap, document,
    },
    error::EngineResult,
};

/// Main execution service.
///
/// Orchestrates variable resolution, the step pipeline, and the commit.
pub struct TemplateExecutor {
    storage: Box<dyn StorageFactory>,
    directory: Box<dyn ApplicationDirectory>,
    progress: Box<dyn ProgressObserver>,
}

impl TemplateExecutor {
    /// Create a new executor with the given adapters and a no-op observer.
    pub fn new(storage: Box<dyn StorageFactory>, directory: Box<dyn ApplicationDirectory>) -> Self {
        Self {
            storage,
            directory,
            progress: Box::new(NoopProgress),
        }
    }

    /// Replace the progress observer (CLI rendering, test recording).
    pub fn with_progress(mut self, progress: Box<dyn ProgressObserver>) -> Self {
        self.progress = progress;
        self
    }

    /// Execute a template against concrete input values and a destination.
    ///
    /// The returned context carries the resolved variables, the final
    /// workspace, and step outputs — whether or not a commit occurred. When
    /// all steps leave the workspace empty, the commit phase is skipped
    /// entirely and the run still succeeds.
    #[instrument(skip_all, fields(template = %template.name))]
    pub fn execute(
        &self,
        template: &Template,
        inputs: &VarMap,
        destination: &StorageRef,
    ) -> EngineResult<ExecutionContext> {
        let vars = domain::resolve_variables(&template.variables, inputs)?;
        let mut context = ExecutionContext::new(vars);

        info!(run_id = %context.run_id, steps = template.steps.len(), "execution started");

        self.run_steps(template, &mut context)?;
        self.commit(&context, destination)?;

        info!(run_id = %context.run_id, files = context.workspace.len(), "execution finished");
        Ok(context)
    }

    // ── Step pipeline ─────────────────────────────────────────────────────

    /// Run every step once, strictly in declared order.
    ///
    /// A failing step aborts the remainder; mutations applied by earlier
    /// steps stand.
    fn run_steps(&self, template: &Template, context: &mut ExecutionContext) -> EngineResult<()> {
        let total = template.steps.len();
        for (index, step) in template.steps.iter().enumerate() {
            self.progress.on_event(&ProgressEvent::StepStarted {
                index,
                total,
                name: step.name.clone(),
            });
            debug!(step = %step.name, kind = step.kind_name(), "executing step");

            match &step.kind {
                StepKind::FileSource { source, selector } => {
                    self.run_file_source(template, source.as_ref(), selector, context)?;
                }
                StepKind::RenameFile {
                    search,
                    replace,
                    selector,
                } => run_rename(search, replace, selector, context)?,
                StepKind::SetValue {
                    pointer,
                    value,
                    selector,
                } => run_set_value(pointer, value, selector, context)?,
                StepKind::CreateApplication { application_name } => {
                    self.run_create_application(&step.name, application_name, context)?;
                }
            }
        }
        Ok(())
    }

    /// Pull matching files out of a source backend (or the bundle itself)
    /// and upsert them into the workspace.
    fn run_file_source(
        &self,
        template: &Template,
        source: Option<&StorageRef>,
        selector: &FileSelector,
        context: &mut ExecutionContext,
    ) -> EngineResult<()> {
        let files = match source {
            None => template
                .source_files
                .iter()
                .filter(|f| selector.is_match(&f.path))
                .cloned()
                .collect(),
            Some(storage_ref) => self.fetch_from_backend(storage_ref, selector)?,
        };

        debug!(count = files.len(), "file source matched");
        for file in files {
            context.workspace.upsert(file);
        }
        Ok(())
    }

    fn fetch_from_backend(
        &self,
        source: &StorageRef,
        selector: &FileSelector,
    ) -> EngineResult<Vec<File>> {
        let mut provider = self.storage.create(source)?;

        let result = read_all(provider.as_mut(), selector);
        let dispose_result = provider.dispose();

        let files = result?;
        dispose_result?;
        Ok(files)
    }

    /// Register an application on the destination platform and record its
    /// id under the step name.
    fn run_create_application(
        &self,
        step_name: &str,
        application_name: &str,
        context: &mut ExecutionContext,
    ) -> EngineResult<()> {
        let resolved = interpolate(application_name, &context.vars);
        let id = self.directory.create_application(&resolved)?;

        info!(application = %resolved, id = %id, "application created");
        context
            .outputs
            .insert(step_name.to_string(), serde_json::Value::String(id));
        Ok(())
    }

    // ── Commit ────────────────────────────────────────────────────────────

    /// Push the workspace to the destination as one batch write.
    ///
    /// The provider session is scoped to this call: `init` runs exactly once
    /// before the batch, `dispose` exactly once after — even when the batch
    /// write fails, in which case the write error is what propagates.
    fn commit(&self, context: &ExecutionContext, destination: &StorageRef) -> EngineResult<()> {
        if context.workspace.is_empty() {
            debug!("workspace is empty, skipping commit");
            return Ok(());
        }

        self.progress.on_event(&ProgressEvent::CommitStarted {
            file_count: context.workspace.len(),
        });
        info!(files = context.workspace.len(), "pushing workspace to destination");

        let mut provider = self.storage.create(destination)?;

        let result = provider
            .init()
            .and_then(|()| provider.store_files(context.workspace.files()));
        let dispose_result = provider.dispose();

        if let Err(dispose_err) = &dispose_result {
            warn!(error = %dispose_err, "destination provider dispose failed");
        }
        result?;
        dispose_result
    }
}

/// Read every selector pattern from an initialised provider.
fn read_all(
    provider: &mut dyn StorageProvider,
    selector: &FileSelector,
) -> EngineResult<Vec<File>> {
    provider.init()?;
    let mut files = Vec::new();
    for pattern in selector.patterns() {
        files.extend(provider.get_files(pattern)?);
    }
    Ok(files)
}

/// Re-key matching workspace files with a search→replace on the path.
fn run_rename(
    search: &str,
    replace: &str,
    selector: &FileSelector,
    context: &mut ExecutionContext,
) -> EngineResult<()> {
    for path in context.workspace.matching_paths(selector) {
        let new_path = path.replace(search, replace);
        if new_path != path {
            context.workspace.rename(&path, &new_path)?;
        }
    }
    Ok(())
}

/// Set a value at a document pointer in every matching workspace file.
fn run_set_value(
    pointer: &str,
    value: &serde_yaml::Value,
    selector: &FileSelector,
    context: &mut ExecutionContext,
) -> EngineResult<()> {
    for path in context.workspace.matching_paths(selector) {
        let file = context
            .workspace
            .get(&path)
            .ok_or_else(|| crate::domain::DomainError::FileNotInWorkspace { path: path.clone() })?;
        let content = file.content_str()?;
        let updated = document::set_value(&path, content, pointer, value)?;
        context.workspace.set_content(&path, updated.into_bytes())?;
    }
    Ok(())
}

/// Substitute `{{name}}` placeholders with resolved variable values.
///
/// Unknown placeholders are left intact. Non-string values render in their
/// JSON form.
fn interpolate(input: &str, vars: &VarMap) -> String {
    let mut result = input.to_string();
    for (key, value) in vars {
        let placeholder = format!("{{{{{key}}}}}");
        if !result.contains(&placeholder) {
            continue;
        }
        let rendered = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        result = result.replace(&placeholder, &rendered);
    }
    result
}

// ── tests ─────────────────────────────────────────────────────────────────────
