//! Template input variables and their resolution rules.
//!
//! A [`Variable`] declares a named, typed template input with an optional
//! default and a required flag. [`resolve_variables`] merges caller-supplied
//! inputs with declared defaults into the final `vars` map used by steps.
//!
//! ## Precedence
//!
//! Caller inputs always win. A default is injected only when the caller did
//! not supply the key at all — an explicit `false`, `0` or `""` is a real
//! value and is never overwritten by a default.
//!
//! ## Required-ness
//!
//! After merging, every `required` variable must have a value. All missing
//! names are collected and reported in a single error, so the caller can fix
//! the whole invocation in one round trip.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DomainError;

/// Resolved variable map, name → value.
///
/// `BTreeMap` rather than `HashMap` so iteration (error listings, CLI
/// output, tests) is deterministic.
pub type VarMap = BTreeMap<String, Value>;

/// Advisory type tag for a template input.
///
/// Not enforced at resolution time — it exists for documentation and for
/// front-ends that want to render a typed prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    #[default]
    String,
    Number,
    Boolean,
}

impl std::fmt::Display for VariableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// A declared template input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Input name, unique within a template.
    pub name: String,

    /// Advisory type tag (see [`VariableKind`]).
    #[serde(rename = "type", default)]
    pub kind: VariableKind,

    /// Value used when the caller does not supply this input.
    #[serde(default)]
    pub default: Option<Value>,

    /// When true, resolution fails if no value is present after merging.
    #[serde(default)]
    pub required: bool,
}

/// Merge caller inputs with declared defaults and enforce required-ness.
///
/// Starts from a copy of `inputs` (keys that no variable declares are kept,
/// not stripped), injects defaults for absent keys, then fails once with
/// *all* still-missing required names.
pub fn resolve_variables(variables: &[Variable], inputs: &VarMap) -> Result<VarMap, DomainError> {
    let mut vars = inputs.clone();

    for variable in variables {
        if let Some(default) = &variable.default {
            vars.entry(variable.name.clone())
                .or_insert_with(|| default.clone());
        }
    }

    // TODO: evaluate templatized variable values before the required check.

    let missing: Vec<String> = variables
        .iter()
        .filter(|v| v.required && !vars.contains_key(&v.name))
        .map(|v| v.name.clone())
        .collect();

    if !missing.is_empty() {
        return Err(DomainError::MissingVariables { names: missing });
    }

    Ok(vars)
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn var(name: &str, default: Option<Value>, required: bool) -> Variable {
        Variable {
            name: name.into(),
            kind: VariableKind::String,
            default,
            required,
        }
    }

    fn inputs(pairs: &[(&str, Value)]) -> VarMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // ── default merging ───────────────────────────────────────────────────

    #[test]
    fn default_injected_when_input_absent() {
        let vars = resolve_variables(
            &[var("env", Some(json!("staging")), false)],
            &VarMap::new(),
        )
        .unwrap();
        assert_eq!(vars["env"], json!("staging"));
    }

    #[test]
    fn input_wins_over_default() {
        let vars = resolve_variables(
            &[var("env", Some(json!("staging")), false)],
            &inputs(&[("env", json!("prod"))]),
        )
        .unwrap();
        assert_eq!(vars["env"], json!("prod"));
    }

    #[test]
    fn falsy_inputs_are_not_overwritten_by_defaults() {
        let declared = [
            var("flag", Some(json!(true)), false),
            var("count", Some(json!(7)), false),
            var("label", Some(json!("x")), false),
        ];
        let vars = resolve_variables(
            &declared,
            &inputs(&[
                ("flag", json!(false)),
                ("count", json!(0)),
                ("label", json!("")),
            ]),
        )
        .unwrap();

        assert_eq!(vars["flag"], json!(false));
        assert_eq!(vars["count"], json!(0));
        assert_eq!(vars["label"], json!(""));
    }

    #[test]
    fn undeclared_input_keys_are_kept() {
        let vars = resolve_variables(&[], &inputs(&[("extra", json!(42))])).unwrap();
        assert_eq!(vars["extra"], json!(42));
    }

    // ── required enforcement ──────────────────────────────────────────────

    #[test]
    fn missing_required_lists_all_names() {
        let declared = [
            var("a", None, true),
            var("b", None, true),
            var("c", Some(json!("ok")), true),
        ];
        let err = resolve_variables(&declared, &VarMap::new()).unwrap_err();
        match err {
            DomainError::MissingVariables { names } => {
                assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_required_message_joins_names() {
        let err = resolve_variables(
            &[var("a", None, true), var("b", None, true)],
            &VarMap::new(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "the following required variables were not provided: a, b"
        );
    }

    #[test]
    fn required_satisfied_by_input() {
        let result = resolve_variables(
            &[var("name", None, true)],
            &inputs(&[("name", json!("payments"))]),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn required_satisfied_by_default() {
        let result = resolve_variables(&[var("name", Some(json!("svc")), true)], &VarMap::new());
        assert_eq!(result.unwrap()["name"], json!("svc"));
    }

    #[test]
    fn explicit_null_counts_as_provided() {
        // Presence is what matters: a supplied null is a value, not an omission.
        let result = resolve_variables(
            &[var("name", None, true)],
            &inputs(&[("name", Value::Null)]),
        );
        assert!(result.is_ok());
    }
}
