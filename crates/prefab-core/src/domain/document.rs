//! Structured-document editing for value-setting steps.
//!
//! A value-setting step addresses a location inside a YAML document with a
//! dotted pointer (`service.replicas`, `metadata.labels.team`). Setting a
//! value creates intermediate mappings as needed; traversing *through* a
//! scalar or sequence is an error — silently replacing a scalar subtree
//! would hide template bugs.

use serde_yaml::{Mapping, Value};

use super::error::DomainError;

/// Parse `content` as YAML, set `value` at the dotted `pointer`, and
/// re-serialize.
///
/// `path` is the workspace path of the file being edited; it only feeds
/// error messages.
pub fn set_value(
    path: &str,
    content: &str,
    pointer: &str,
    value: &Value,
) -> Result<String, DomainError> {
    let mut doc: Value = serde_yaml::from_str(content).map_err(|e| DomainError::DocumentParse {
        path: path.into(),
        reason: e.to_string(),
    })?;

    // An empty document parses as null; treat it as an empty mapping so
    // pointers can be created from scratch.
    if doc.is_null() {
        doc = Value::Mapping(Mapping::new());
    }

    set_at_pointer(path, &mut doc, pointer, value)?;

    serde_yaml::to_string(&doc).map_err(|e| DomainError::DocumentParse {
        path: path.into(),
        reason: e.to_string(),
    })
}

fn set_at_pointer(
    path: &str,
    root: &mut Value,
    pointer: &str,
    value: &Value,
) -> Result<(), DomainError> {
    let segments: Vec<&str> = pointer.split('.').collect();
    if pointer.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return Err(DomainError::InvalidPointer {
            pointer: pointer.into(),
            reason: "expected non-empty dot-separated segments".into(),
        });
    }

    let (last, parents) = segments
        .split_last()
        .expect("segments checked non-empty above");

    let mut node = root;
    for segment in parents {
        let map = node
            .as_mapping_mut()
            .ok_or_else(|| DomainError::NotAMapping {
                path: path.into(),
                pointer: pointer.into(),
                segment: (*segment).into(),
            })?;
        node = map
            .entry(Value::String((*segment).to_string()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }

    let map = node
        .as_mapping_mut()
        .ok_or_else(|| DomainError::NotAMapping {
            path: path.into(),
            pointer: pointer.into(),
            segment: (*last).into(),
        })?;
    map.insert(Value::String((*last).to_string()), value.clone());
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────
