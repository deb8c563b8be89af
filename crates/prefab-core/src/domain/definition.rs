//! Declarative template definitions.
//!
//! A template bundle declares itself in a `template.yaml` manifest. These
//! structs are the serde view of that manifest; [`super::Template`] is the
//! validated, executable form. The engine does not prescribe YAML — any
//! structured format serde can drive carries the same shape.
//!
//! # Manifest format
//!
//! ```yaml
//! name: payments-service
//! description: Provision the payments service config
//! template_version: "1.2.0"
//! schema_version: "1"
//! author: Platform Team
//!
//! variables:
//!   - name: service_name
//!     type: string
//!     required: true
//!   - name: replicas
//!     type: number
//!     default: 2
//!
//! steps:
//!   - type: file-source          # no source ⇒ read the bundle's own files
//!     name: import bundle
//!   - type: rename-file
//!     name: move into service dir
//!     search: "skeleton"
//!     replace: "services"
//!   - type: set-value
//!     name: pin replica count
//!     path: spec.replicas
//!     value: 2
//!     file: services/app.yaml    # single-file convenience form
//!   - type: create-application
//!     name: register app
//!     application_name: "{{service_name}}"
//! ```
//!
//! Steps without `files`/`file` get the default `**/*.yaml` selector.

use serde::Deserialize;

use super::storage::StorageRef;
use super::template::TemplateRef;
use super::variable::Variable;

/// Deserialised representation of a `template.yaml` manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDefinition {
    /// Template name; must be non-empty.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template_version: Option<String>,
    #[serde(default)]
    pub schema_version: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Composition point: a reference to a parent template. Carried through
    /// but not expanded by this engine.
    #[serde(default)]
    pub parent: Option<TemplateRef>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
}

/// One entry under `steps`, discriminated by its `type` tag.
///
/// Unknown tags are rejected at deserialization time.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StepDefinition {
    FileSource {
        name: String,
        #[serde(default)]
        source: Option<StorageRef>,
        #[serde(default)]
        files: Vec<String>,
        #[serde(default)]
        file: Option<String>,
    },
    RenameFile {
        name: String,
        search: String,
        replace: String,
        #[serde(default)]
        files: Vec<String>,
        #[serde(default)]
        file: Option<String>,
    },
    SetValue {
        name: String,
        /// Dotted document pointer, e.g. `spec.replicas`.
        path: String,
        value: serde_yaml::Value,
        #[serde(default)]
        files: Vec<String>,
        #[serde(default)]
        file: Option<String>,
    },
    CreateApplication {
        name: String,
        application_name: String,
    },
}

impl StepDefinition {
    pub fn name(&self) -> &str {
        match self {
            Self::FileSource { name, .. }
            | Self::RenameFile { name, .. }
            | Self::SetValue { name, .. }
            | Self::CreateApplication { name, .. } => name,
        }
    }

    /// Merge the `files` list with the single-`file` convenience field.
    pub(crate) fn patterns(&self) -> Vec<String> {
        let (files, file) = match self {
            Self::FileSource { files, file, .. }
            | Self::RenameFile { files, file, .. }
            | Self::SetValue { files, file, .. } => (files.clone(), file.clone()),
            Self::CreateApplication { .. } => (Vec::new(), None),
        };
        let mut patterns = files;
        patterns.extend(file);
        patterns
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_manifest() {
        let def: TemplateDefinition = serde_yaml::from_str("name: minimal\n").unwrap();
        assert_eq!(def.name, "minimal");
        assert!(def.variables.is_empty());
        assert!(def.steps.is_empty());
    }

    #[test]
    fn parses_all_step_tags() {
        let manifest = r#"
name: full
steps:
  - type: file-source
    name: import
  - type: rename-file
    name: move
    search: old
    replace: new
  - type: set-value
    name: pin
    path: spec.replicas
    value: 3
  - type: create-application
    name: register
    application_name: "{{service}}"
"#;
        let def: TemplateDefinition = serde_yaml::from_str(manifest).unwrap();
        assert_eq!(def.steps.len(), 4);
        assert!(matches!(def.steps[0], StepDefinition::FileSource { .. }));
        assert!(matches!(def.steps[1], StepDefinition::RenameFile { .. }));
        assert!(matches!(def.steps[2], StepDefinition::SetValue { .. }));
        assert!(matches!(
            def.steps[3],
            StepDefinition::CreateApplication { .. }
        ));
    }

    #[test]
    fn unknown_step_tag_is_rejected() {
        let manifest = r#"
name: bad
steps:
  - type: teleport-file
    name: nope
"#;
        assert!(serde_yaml::from_str::<TemplateDefinition>(manifest).is_err());
    }

    #[test]
    fn file_and_files_merge_into_patterns() {
        let manifest = r#"
name: t
steps:
  - type: rename-file
    name: r
    search: a
    replace: b
    files: ["one.yaml", "two.yaml"]
    file: three.yaml
"#;
        let def: TemplateDefinition = serde_yaml::from_str(manifest).unwrap();
        assert_eq!(
            def.steps[0].patterns(),
            vec!["one.yaml", "two.yaml", "three.yaml"]
        );
    }

    #[test]
    fn file_source_with_explicit_storage_ref() {
        let manifest = r#"
name: t
steps:
  - type: file-source
    name: from shared store
    source:
      type: directory
      options:
        root: /srv/shared
"#;
        let def: TemplateDefinition = serde_yaml::from_str(manifest).unwrap();
        match &def.steps[0] {
            StepDefinition::FileSource { source, .. } => {
                let source = source.as_ref().unwrap();
                assert_eq!(source.storage_type.to_string(), "directory");
                assert_eq!(source.options["root"], "/srv/shared");
            }
            other => panic!("unexpected step: {other:?}"),
        }
    }

    #[test]
    fn variable_declarations_parse() {
        let manifest = r#"
name: t
variables:
  - name: service_name
    type: string
    required: true
  - name: replicas
    type: number
    default: 2
"#;
        let def: TemplateDefinition = serde_yaml::from_str(manifest).unwrap();
        assert_eq!(def.variables.len(), 2);
        assert!(def.variables[0].required);
        assert_eq!(def.variables[1].default, Some(serde_json::json!(2)));
    }
}
