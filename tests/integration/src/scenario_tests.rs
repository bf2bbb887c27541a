//! End-to-end scenarios exercising the store, service, sync engine, and
//! resolution API together through their public interfaces.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use registry_core::{
    ConfigResolver, Error, HistoryAction, NewVersion, SyncEngine, SyncOptions, SyncSource,
    SyncStatus, VersionService, VersionStore,
};
use registry_meta::{ComponentDocument, ComponentType, DocumentScanner};
use serde_json::json;
use tempfile::TempDir;

struct World {
    _temp: TempDir,
    root: PathBuf,
    service: VersionService,
    engine: SyncEngine,
}

fn world() -> World {
    let temp = TempDir::new().unwrap();
    let root = temp.path().to_path_buf();
    let service = VersionService::new(VersionStore::open(root.join(".registry")).unwrap());
    let engine = SyncEngine::new(DocumentScanner::new(&root), service.clone());
    World {
        _temp: temp,
        root,
        service,
        engine,
    }
}

fn demo_version(version: u32, is_active: bool) -> NewVersion {
    NewVersion {
        component_id: "demo".to_string(),
        component_type: ComponentType::Agent,
        version,
        config: json!({
            "agent": {"agent_id": "demo", "version": version},
            "model": {"provider": "anthropic"},
        }),
        created_by: "operator".to_string(),
        description: None,
        is_active,
        sync_source: SyncSource::Api,
    }
}

/// Scenario 1: create version 1 active, then read it back as the active one.
#[test]
fn first_version_becomes_active() {
    let w = world();
    w.service.create_version(demo_version(1, true)).unwrap();

    assert_eq!(w.service.get_active_version("demo").unwrap().version, 1);
}

/// Scenario 2: activating a later inactive version flips the active flag
/// and leaves exactly one activation record referencing it.
#[test]
fn activation_moves_the_flag_and_audits_once() {
    let w = world();
    w.service.create_version(demo_version(1, true)).unwrap();
    w.service.create_version(demo_version(2, false)).unwrap();

    w.service
        .activate_version("demo", 2, "operator", Some("promote"), SyncSource::Api)
        .unwrap();

    assert!(!w.service.get_version("demo", 1).unwrap().is_active);
    assert!(w.service.get_version("demo", 2).unwrap().is_active);

    let activations: Vec<_> = w
        .service
        .get_history("demo", None)
        .unwrap()
        .into_iter()
        .filter(|h| h.action == HistoryAction::Activated)
        .collect();
    assert_eq!(activations.len(), 1);
    assert_eq!(activations[0].version, 2);
}

/// Scenario 3: deprecating the active version is refused and changes nothing.
#[test]
fn deprecating_the_active_version_is_refused() {
    let w = world();
    w.service.create_version(demo_version(1, true)).unwrap();
    w.service.create_version(demo_version(2, true)).unwrap();

    let err = w
        .service
        .deprecate_version("demo", 2, "operator", None)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    assert!(!w.service.get_version("demo", 2).unwrap().is_deprecated);
    assert_eq!(w.service.get_active_version("demo").unwrap().version, 2);
}

/// Scenario 4: a file declaring version 3 while the store is at 2 moves the
/// store forward, activates the new version, and reports `updated`.
#[test]
fn file_ahead_is_adopted_and_activated() {
    let w = world();
    w.service.create_version(demo_version(2, true)).unwrap();

    let dir = w.root.join("agents/demo");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("config.yaml"),
        "agent:\n  agent_id: demo\n  version: 3\nmodel:\n  provider: anthropic\n  id: sonnet\n",
    )
    .unwrap();

    let report = w.engine.sync_all(&SyncOptions::default()).unwrap();
    assert_eq!(report.results[0].status, SyncStatus::Updated);

    let active = w.service.get_active_version("demo").unwrap();
    assert_eq!(active.version, 3);
    assert_eq!(active.config["model"]["id"], json!("sonnet"));
}

/// Scenario 5: a hand-edited file at the store's version is corrected back
/// to the store's config, which stays authoritative.
#[test]
fn hand_edit_at_same_version_is_corrected() {
    let w = world();
    let dir = w.root.join("agents/demo");
    fs::create_dir_all(&dir).unwrap();
    let file = dir.join("config.yaml");
    fs::write(
        &file,
        "agent:\n  agent_id: demo\n  version: 3\nmodel:\n  provider: anthropic\n",
    )
    .unwrap();
    w.engine.sync_all(&SyncOptions::default()).unwrap();
    let stored = w.service.get_active_version("demo").unwrap();

    fs::write(
        &file,
        "agent:\n  agent_id: demo\n  version: 3\nmodel:\n  provider: someone-else\n",
    )
    .unwrap();

    let report = w.engine.sync_all(&SyncOptions::default()).unwrap();
    assert_eq!(report.results[0].status, SyncStatus::YamlCorrected);

    let reparsed = ComponentDocument::load(&file, ComponentType::Agent).unwrap();
    assert_eq!(reparsed.config, stored.config);
}

/// After convergence, factories resolve the same config the file declares.
#[test]
fn resolution_matches_the_converged_file() {
    let w = world();
    copy_fixture_tree(&w.root);

    let report = w.engine.sync_all(&SyncOptions::default()).unwrap();
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.count(SyncStatus::Created), 3);

    let resolver = ConfigResolver::new(w.service.clone());
    let team = resolver.resolve("ana-team", None).unwrap();
    assert_eq!(team["team"]["mode"], json!("route"));

    let workflow = resolver.resolve("escalation-workflow", Some(2)).unwrap();
    assert_eq!(workflow["workflow"]["workflow_id"], json!("escalation-workflow"));

    // A second pass over the converged tree is a pure no-op.
    let second = w.engine.sync_all(&SyncOptions::default()).unwrap();
    assert!(second.is_converged());
}

fn copy_fixture_tree(root: &Path) {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/components");
    copy_dir(&fixtures, root);
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let dest = to.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir(&entry.path(), &dest);
        } else {
            fs::copy(entry.path(), &dest).unwrap();
        }
    }
}
