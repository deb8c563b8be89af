//! Integration tests for `prefab run` and `prefab inspect`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a bundle directory (template.yaml + files/) under `root`.
fn write_bundle(root: &Path, manifest: &str, files: &[(&str, &str)]) {
    fs::create_dir_all(root).unwrap();
    fs::write(root.join("template.yaml"), manifest).unwrap();
    for (rel, content) in files {
        let full = root.join("files").join(rel);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
}

const MANIFEST: &str = r#"
name: itest
variables:
  - name: service
    required: true
  - name: replicas
    type: number
    default: 2
steps:
  - type: file-source
    name: import bundle
  - type: rename-file
    name: move into services
    search: skeleton
    replace: services
  - type: set-value
    name: pin replicas
    path: spec.replicas
    value: 5
  - type: create-application
    name: register
    application_name: "{{service}}"
"#;

fn prefab() -> Command {
    Command::cargo_bin("prefab").unwrap()
}

#[test]
fn run_commits_transformed_workspace() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("bundle");
    let out = temp.path().join("out");
    write_bundle(&bundle, MANIFEST, &[("skeleton/app.yaml", "spec: {}\n")]);

    prefab()
        .args([
            "run",
            bundle.to_str().unwrap(),
            "--var",
            "service=payments",
            "--dest",
            out.to_str().unwrap(),
            "--yes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Committed 1 file(s)"))
        .stdout(predicate::str::contains("register"));

    // The yaml file was renamed and mutated before commit.
    let committed = fs::read_to_string(out.join("services/app.yaml")).unwrap();
    assert!(committed.contains("replicas: 5"), "got: {committed}");
    assert!(!out.join("skeleton/app.yaml").exists());
}

#[test]
fn run_with_memory_destination_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("bundle");
    write_bundle(&bundle, MANIFEST, &[("skeleton/app.yaml", "spec: {}\n")]);

    prefab()
        .current_dir(temp.path())
        .args([
            "run",
            bundle.to_str().unwrap(),
            "--var",
            "service=payments",
            "--dest-memory",
            "scratch",
            "--yes",
            "--show-files",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("services/app.yaml"));

    // Nothing landed on disk.
    assert!(!temp.path().join("services").exists());
    assert!(!temp.path().join("scratch").exists());
}

#[test]
fn run_empty_workspace_succeeds_without_commit() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("bundle");
    let out = temp.path().join("out");
    // No steps, no files: the workspace stays empty.
    write_bundle(&bundle, "name: empty\n", &[]);

    prefab()
        .args([
            "run",
            bundle.to_str().unwrap(),
            "--dest",
            out.to_str().unwrap(),
            "--yes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No files produced"));

    // Commit was skipped: the destination directory was never created.
    assert!(!out.exists());
}

#[test]
fn run_var_values_keep_their_types() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("bundle");
    let out = temp.path().join("out");
    // An explicit false must win over the default `true`.
    let manifest = r#"
name: typed
variables:
  - name: enabled
    type: boolean
    default: true
steps:
  - type: file-source
    name: import
  - type: set-value
    name: record flag
    path: flags.enabled
    value: placeholder
"#;
    write_bundle(&bundle, manifest, &[("app.yaml", "flags: {}\n")]);

    prefab()
        .args([
            "run",
            bundle.to_str().unwrap(),
            "--var",
            "enabled=false",
            "--dest",
            out.to_str().unwrap(),
            "--yes",
        ])
        .assert()
        .success();

    assert!(out.join("app.yaml").exists());
}

#[test]
fn inspect_lists_variables_and_steps() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("bundle");
    write_bundle(&bundle, MANIFEST, &[("skeleton/app.yaml", "spec: {}\n")]);

    prefab()
        .args(["inspect", bundle.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("itest"))
        .stdout(predicate::str::contains("service"))
        .stdout(predicate::str::contains("[required]"))
        .stdout(predicate::str::contains("rename-file"))
        .stdout(predicate::str::contains("create-application"));
}

#[test]
fn inspect_json_is_machine_readable() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("bundle");
    write_bundle(&bundle, MANIFEST, &[("skeleton/app.yaml", "spec: {}\n")]);

    let output = prefab()
        .args(["inspect", bundle.to_str().unwrap(), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["name"], "itest");
    assert_eq!(report["steps"].as_array().unwrap().len(), 4);
    assert_eq!(report["variables"][0]["name"], "service");
}

#[test]
fn help_shows_subcommands() {
    prefab()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_matches_cargo() {
    prefab()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn completions_generate_bash_script() {
    prefab()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prefab"));
}
