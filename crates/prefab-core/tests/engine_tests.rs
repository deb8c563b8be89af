//! End-to-end engine tests: definition → template → execute → commit.
//!
//! Uses self-contained in-process fakes for the storage and platform ports
//! (the real adapters live in `prefab-adapters`, which depends on this
//! crate and therefore cannot be used here).

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::json;

use prefab_core::{
    application::{
        ApplicationDirectory, StorageFactory, StorageProvider, TemplateExecutor,
        error::ApplicationError,
    },
    domain::{File, StorageRef, StorageType, Template, TemplateDefinition, VarMap},
    error::EngineResult,
};

// ── fakes ─────────────────────────────────────────────────────────────────────

/// Shared in-memory file store observable after the executor disposes the
/// provider, plus call counters for the session discipline assertions.
#[derive(Default)]
struct FakeStoreState {
    files: BTreeMap<String, Vec<u8>>,
    init_calls: usize,
    store_calls: usize,
    dispose_calls: usize,
}

#[derive(Clone, Default)]
struct FakeStore {
    state: Arc<Mutex<FakeStoreState>>,
}

impl FakeStore {
    fn with_files(files: &[(&str, &str)]) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            for (path, content) in files {
                state
                    .files
                    .insert((*path).to_string(), content.as_bytes().to_vec());
            }
        }
        store
    }

    fn paths(&self) -> Vec<String> {
        self.state.lock().unwrap().files.keys().cloned().collect()
    }

    fn content(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    fn counts(&self) -> (usize, usize, usize) {
        let state = self.state.lock().unwrap();
        (state.init_calls, state.store_calls, state.dispose_calls)
    }
}

struct FakeProvider {
    store: FakeStore,
}

impl StorageProvider for FakeProvider {
    fn init(&mut self) -> EngineResult<()> {
        self.store.state.lock().unwrap().init_calls += 1;
        Ok(())
    }

    fn list_files(&self, pattern: Option<&str>) -> EngineResult<Vec<(String, u64)>> {
        let matcher = pattern.map(compile);
        let state = self.store.state.lock().unwrap();
        Ok(state
            .files
            .iter()
            .filter(|(path, _)| matcher.as_ref().is_none_or(|m| m.is_match(path)))
            .map(|(path, content)| (path.clone(), content.len() as u64))
            .collect())
    }

    fn file_exists(&self, path: &str) -> EngineResult<bool> {
        Ok(self.store.state.lock().unwrap().files.contains_key(path))
    }

    fn get_file(&self, path: &str) -> EngineResult<File> {
        self.store
            .content(path)
            .map(|content| File::new(path, content))
            .ok_or_else(|| ApplicationError::FileNotFound { path: path.into() }.into())
    }

    fn get_files(&self, pattern: &str) -> EngineResult<Vec<File>> {
        let matcher = compile(pattern);
        let state = self.store.state.lock().unwrap();
        Ok(state
            .files
            .iter()
            .filter(|(path, _)| matcher.is_match(path))
            .map(|(path, content)| File::new(path.clone(), content.clone()))
            .collect())
    }

    fn store_file(&mut self, file: &File) -> EngineResult<()> {
        self.store
            .state
            .lock()
            .unwrap()
            .files
            .insert(file.path.clone(), file.content.clone());
        Ok(())
    }

    fn store_files(&mut self, files: &[File]) -> EngineResult<()> {
        let mut state = self.store.state.lock().unwrap();
        state.store_calls += 1;
        for file in files {
            state.files.insert(file.path.clone(), file.content.clone());
        }
        Ok(())
    }

    fn delete_file(&mut self, path: &str) -> EngineResult<()> {
        self.store.state.lock().unwrap().files.remove(path);
        Ok(())
    }

    fn delete_files(&mut self, pattern: &str) -> EngineResult<()> {
        let matcher = compile(pattern);
        let mut state = self.store.state.lock().unwrap();
        state.files.retain(|path, _| !matcher.is_match(path));
        Ok(())
    }

    fn dispose(&mut self) -> EngineResult<()> {
        self.store.state.lock().unwrap().dispose_calls += 1;
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Memory
    }

    fn config(&self) -> serde_json::Value {
        json!({ "fake": true })
    }
}

fn compile(pattern: &str) -> globset::GlobMatcher {
    globset::Glob::new(pattern).unwrap().compile_matcher()
}

/// Factory resolving refs by name against a fixed set of fake stores.
#[derive(Default)]
struct FakeFactory {
    stores: BTreeMap<String, FakeStore>,
}

impl FakeFactory {
    fn with(mut self, name: &str, store: FakeStore) -> Self {
        self.stores.insert(name.into(), store);
        self
    }
}

impl StorageFactory for FakeFactory {
    fn create(&self, storage_ref: &StorageRef) -> EngineResult<Box<dyn StorageProvider>> {
        let name = storage_ref.options["name"]
            .as_str()
            .ok_or_else(|| ApplicationError::InvalidOptions {
                reason: "missing name".into(),
            })?;
        let store = self
            .stores
            .get(name)
            .ok_or_else(|| ApplicationError::UnknownBackend {
                storage_type: name.into(),
            })?;
        Ok(Box::new(FakeProvider {
            store: store.clone(),
        }))
    }
}

#[derive(Clone, Default)]
struct FakeDirectory {
    created: Arc<Mutex<Vec<String>>>,
}

impl ApplicationDirectory for FakeDirectory {
    fn create_application(&self, name: &str) -> EngineResult<String> {
        let mut created = self.created.lock().unwrap();
        created.push(name.to_string());
        Ok(format!("id-{}", created.len()))
    }
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn make_template(manifest: &str, source_files: &[(&str, &str)]) -> Template {
    let definition: TemplateDefinition = serde_yaml::from_str(manifest).unwrap();
    let files = source_files
        .iter()
        .map(|(path, content)| File::new(*path, content.as_bytes().to_vec()))
        .collect();
    Template::from_definition(definition, files).unwrap()
}

fn memory_ref(name: &str) -> StorageRef {
    StorageRef::new(StorageType::Memory, json!({ "name": name }))
}

// ── full pipeline ─────────────────────────────────────────────────────────────

#[test]
fn full_pipeline_reads_transforms_and_commits() {
    let manifest = r#"
name: payments
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
    name: move into service dir
    search: skeleton
    replace: services
  - type: set-value
    name: pin replicas
    path: spec.replicas
    value: 2
  - type: create-application
    name: register
    application_name: "{{service}}"
"#;
    let template = make_template(
        manifest,
        &[
            ("skeleton/app.yaml", "spec: {}\n"),
            ("skeleton/notes.txt", "not yaml"),
        ],
    );

    let dest = FakeStore::default();
    let factory = FakeFactory::default().with("dest", dest.clone());
    let directory = FakeDirectory::default();

    let executor = TemplateExecutor::new(Box::new(factory), Box::new(directory.clone()));

    let mut inputs = VarMap::new();
    inputs.insert("service".into(), json!("payments"));

    let context = executor
        .execute(&template, &inputs, &memory_ref("dest"))
        .unwrap();

    // Only the YAML file was selected by the default pattern; it was renamed
    // and mutated, then committed as a batch.
    assert_eq!(dest.paths(), vec!["services/app.yaml"]);
    let committed = String::from_utf8(dest.content("services/app.yaml").unwrap()).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&committed).unwrap();
    assert_eq!(doc["spec"]["replicas"], serde_yaml::Value::Number(2.into()));

    // Session discipline: one init, one batch write, one dispose.
    assert_eq!(dest.counts(), (1, 1, 1));

    // The application was registered with the interpolated name and its id
    // recorded under the step name.
    assert_eq!(*directory.created.lock().unwrap(), vec!["payments"]);
    assert_eq!(context.outputs["register"], json!("id-1"));

    // Defaults merged into the returned context.
    assert_eq!(context.vars["replicas"], json!(2));
}

#[test]
fn file_source_reads_from_external_backend() {
    let manifest = r#"
name: t
steps:
  - type: file-source
    name: from shared store
    source:
      type: memory
      options:
        name: shared
    files: ["pipelines/**/*.yaml"]
"#;
    let shared = FakeStore::with_files(&[
        ("pipelines/ci/build.yaml", "kind: pipeline\n"),
        ("pipelines/readme.md", "docs"),
        ("other/app.yaml", "kind: app\n"),
    ]);
    let dest = FakeStore::default();
    let factory = FakeFactory::default()
        .with("shared", shared.clone())
        .with("dest", dest.clone());

    let executor = TemplateExecutor::new(Box::new(factory), Box::new(FakeDirectory::default()));
    let template = make_template(manifest, &[]);
    executor
        .execute(&template, &VarMap::new(), &memory_ref("dest"))
        .unwrap();

    assert_eq!(dest.paths(), vec!["pipelines/ci/build.yaml"]);
    // The source backend session was also opened and released exactly once.
    assert_eq!(shared.counts().0, 1);
    assert_eq!(shared.counts().2, 1);
}

#[test]
fn no_matching_source_files_is_not_an_error() {
    let manifest = r#"
name: t
steps:
  - type: file-source
    name: import
    files: ["missing/**/*.yaml"]
"#;
    let template = make_template(manifest, &[("app.yaml", "x: 1\n")]);
    let executor = TemplateExecutor::new(
        Box::new(FakeFactory::default()),
        Box::new(FakeDirectory::default()),
    );

    // Empty workspace ⇒ commit skipped ⇒ no provider needed at all.
    let context = executor
        .execute(&template, &VarMap::new(), &memory_ref("dest"))
        .unwrap();
    assert!(context.workspace.is_empty());
}

#[test]
fn no_op_template_never_touches_the_destination() {
    let dest = FakeStore::default();
    let factory = FakeFactory::default().with("dest", dest.clone());

    let executor = TemplateExecutor::new(Box::new(factory), Box::new(FakeDirectory::default()));
    let template = make_template("name: empty\n", &[]);
    executor
        .execute(&template, &VarMap::new(), &memory_ref("dest"))
        .unwrap();

    assert_eq!(dest.counts(), (0, 0, 0));
}

#[test]
fn rename_collision_aborts_the_pipeline() {
    let manifest = r#"
name: t
steps:
  - type: file-source
    name: import
  - type: rename-file
    name: collide
    search: "v2/"
    replace: ""
"#;
    // Renaming v2/app.yaml to app.yaml collides with the existing app.yaml.
    let template = make_template(
        manifest,
        &[("app.yaml", "a: 1\n"), ("v2/app.yaml", "a: 2\n")],
    );
    let executor = TemplateExecutor::new(
        Box::new(FakeFactory::default()),
        Box::new(FakeDirectory::default()),
    );

    let err = executor
        .execute(&template, &VarMap::new(), &memory_ref("dest"))
        .unwrap_err();
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn returned_context_exposes_partial_workspace_on_failure() {
    // A failing step leaves earlier mutations in place; the error carries no
    // rollback. The context itself is not returned on failure, but the
    // destination must stay untouched.
    let manifest = r#"
name: t
steps:
  - type: file-source
    name: import
  - type: set-value
    name: bad pointer
    path: scalar.inner
    value: x
"#;
    let template = make_template(manifest, &[("app.yaml", "scalar: 5\n")]);
    let dest = FakeStore::default();
    let factory = FakeFactory::default().with("dest", dest.clone());
    let executor = TemplateExecutor::new(Box::new(factory), Box::new(FakeDirectory::default()));

    assert!(
        executor
            .execute(&template, &VarMap::new(), &memory_ref("dest"))
            .is_err()
    );
    assert_eq!(dest.counts(), (0, 0, 0));
}
