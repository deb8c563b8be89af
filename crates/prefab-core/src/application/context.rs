//! Per-execution state shared by the step pipeline.

use uuid::Uuid;

use crate::domain::{VarMap, Workspace};

/// Everything one `execute()` call owns: resolved variables, the file
/// workspace, and step outputs.
///
/// A context is private to its execution — it is created after variable
/// resolution succeeds, threaded through every step in order, and returned
/// to the caller whether or not a commit occurred. It is never shared
/// between concurrent executions.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Unique id for this run, used in logs and diagnostics.
    pub run_id: Uuid,
    /// Resolved variable map (inputs merged with defaults).
    pub vars: VarMap,
    /// The in-memory file workspace mutated by steps.
    pub workspace: Workspace,
    /// Step results consumed by later steps or reported to the caller
    /// (e.g. the identifier minted by a create-application step).
    pub outputs: VarMap,
}

impl ExecutionContext {
    pub(crate) fn new(vars: VarMap) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            vars,
            workspace: Workspace::new(),
            outputs: VarMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_empty_apart_from_vars() {
        let mut vars = VarMap::new();
        vars.insert("k".into(), serde_json::json!("v"));

        let ctx = ExecutionContext::new(vars);
        assert!(ctx.workspace.is_empty());
        assert!(ctx.outputs.is_empty());
        assert_eq!(ctx.vars["k"], serde_json::json!("v"));
        assert!(!ctx.run_id.is_nil());
    }
}
