//! The template aggregate: variables, steps, and bundled source files.
//!
//! A [`Template`] is built once from a [`TemplateDefinition`] plus the
//! bundle's raw file set, then executed any number of times by the
//! application-layer executor. Construction is where definition-level
//! invariants are enforced: a non-empty name, unique variable names, and
//! compilable file selectors (with the YAML catch-all substituted for steps
//! that declare none).
//!
//! Declared step order is execution order. There is no reordering and no
//! dependency inference.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::definition::{StepDefinition, TemplateDefinition};
use super::error::DomainError;
use super::selector::FileSelector;
use super::step::{Step, StepKind};
use super::workspace::File;

/// Reference to another template (composition point, not expanded here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub source: String,
}

/// A reusable, parameterized bundle of source files plus ordered
/// transformation steps.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub description: Option<String>,
    pub template_version: Option<String>,
    pub schema_version: Option<String>,
    pub author: Option<String>,
    pub parent: Option<TemplateRef>,
    /// The bundle's raw file set, read by sourceless file-source steps.
    pub source_files: Vec<File>,
    pub variables: Vec<super::variable::Variable>,
    pub steps: Vec<Step>,
}

impl Template {
    /// Build an executable template from its declarative definition.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidDefinition`] for an empty name
    /// - [`DomainError::DuplicateVariable`] for repeated variable names
    /// - [`DomainError::InvalidPattern`] for bad step glob syntax
    pub fn from_definition(
        definition: TemplateDefinition,
        source_files: Vec<File>,
    ) -> Result<Self, DomainError> {
        if definition.name.trim().is_empty() {
            return Err(DomainError::InvalidDefinition(
                "template name cannot be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for variable in &definition.variables {
            if !seen.insert(variable.name.as_str()) {
                return Err(DomainError::DuplicateVariable {
                    name: variable.name.clone(),
                });
            }
        }

        let steps = definition
            .steps
            .iter()
            .map(build_step)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: definition.name,
            description: definition.description,
            template_version: definition.template_version,
            schema_version: definition.schema_version,
            author: definition.author,
            parent: definition.parent,
            source_files,
            variables: definition.variables,
            steps,
        })
    }
}

/// Lower one step definition into its executable form, compiling the file
/// selector (default substituted when no patterns were declared).
fn build_step(definition: &StepDefinition) -> Result<Step, DomainError> {
    let name = definition.name().to_string();
    let kind = match definition {
        StepDefinition::FileSource { source, .. } => StepKind::FileSource {
            source: source.clone(),
            selector: FileSelector::new(definition.patterns())?,
        },
        StepDefinition::RenameFile {
            search, replace, ..
        } => StepKind::RenameFile {
            search: search.clone(),
            replace: replace.clone(),
            selector: FileSelector::new(definition.patterns())?,
        },
        StepDefinition::SetValue { path, value, .. } => StepKind::SetValue {
            pointer: path.clone(),
            value: value.clone(),
            selector: FileSelector::new(definition.patterns())?,
        },
        StepDefinition::CreateApplication {
            application_name, ..
        } => StepKind::CreateApplication {
            application_name: application_name.clone(),
        },
    };
    Ok(Step { name, kind })
}

// ── tests ─────────────────────────────────────────────────────────────────────
