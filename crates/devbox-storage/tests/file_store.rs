use std::time::Duration;

use devbox_core::{App, Component, ComponentState, Env};
use devbox_storage::{AppStore, ComponentRegistry, EnvStore, FileStore, ModelStore, StorageError};

#[tokio::test]
async fn components_persist_across_store_instances() {
    let dir = tempfile::tempdir().expect("tmp dir");

    let store = FileStore::new(dir.path());
    let db = Component::new("env_dev", "data.db")
        .with_image("postgres:13")
        .with_state(ComponentState::Active);
    store.save_component(&db).await.unwrap();
    store
        .save_component(&Component::new("env_dev", "data.cache").with_image("redis:6"))
        .await
        .unwrap();

    let reopened = FileStore::new(dir.path());
    let components = reopened.all_components_by_app("env_dev").await.unwrap();
    let names: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["data.cache", "data.db"]);

    let found = reopened
        .find_component("env_dev", "data.db")
        .await
        .unwrap()
        .expect("component should exist");
    assert_eq!(found, db);
}

#[tokio::test]
async fn missing_records_are_none_not_errors() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let store = FileStore::new(dir.path());

    assert!(store.find_component("env_dev", "data.db").await.unwrap().is_none());
    assert!(store.all_components_by_app("env_dev").await.unwrap().is_empty());
    assert!(store.load_app("env_dev").await.unwrap().is_none());
    assert!(store.load_env("env").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_component_removes_record_and_tolerates_missing() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let store = FileStore::new(dir.path());

    store
        .save_component(&Component::new("env_dev", "web.site"))
        .await
        .unwrap();
    store.delete_component("env_dev", "web.site").await.unwrap();
    assert!(store.find_component("env_dev", "web.site").await.unwrap().is_none());

    store.delete_component("env_dev", "web.site").await.unwrap();
}

#[tokio::test]
async fn app_and_env_records_round_trip() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let store = FileStore::new(dir.path());

    let mut env = Env::new("/src/project");
    env.set_built("data.db:\n  image: postgres:13\n", Some("b1".into()));
    let mut app = App::new(&env.id, "dev");
    app.deployed_boxfile = env.built_boxfile.clone();

    store.save_env(&env).await.unwrap();
    store.save_app(&app).await.unwrap();

    assert_eq!(store.load_env(&env.id).await.unwrap(), Some(env));
    assert_eq!(store.load_app(&app.id).await.unwrap(), Some(app));
    assert_eq!(store.backend_name(), "file");
}

#[tokio::test]
async fn corrupt_record_is_a_serialization_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let store = FileStore::new(dir.path());
    let apps = dir.path().join("apps");
    std::fs::create_dir_all(&apps).unwrap();
    std::fs::write(apps.join("broken.json"), b"{not json").unwrap();

    let err = store.load_app("broken").await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization { .. }));
}

#[tokio::test]
async fn traversal_keys_are_rejected() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let store = FileStore::new(dir.path());

    let err = store
        .save_component(&Component::new("env_dev", "../escape"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidRecord { .. }));
}

#[tokio::test]
async fn app_lock_excludes_other_holders_until_dropped() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let first = FileStore::new(dir.path());
    let guard = first.lock_app("env_dev").await.unwrap();
    assert!(guard.path().ends_with("locks/env_dev.lock"));

    // A second store stands in for another process: it opens its own handle.
    let second = FileStore::new(dir.path());
    let waiter = tokio::spawn(async move { second.lock_app("env_dev").await });

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!waiter.is_finished(), "second holder must wait");

    drop(guard);
    let relocked = tokio::time::timeout(Duration::from_secs(5), waiter)
        .await
        .expect("lock should be granted after release")
        .unwrap();
    assert!(relocked.is_ok());
}

#[tokio::test]
async fn app_locks_are_per_app() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let store = FileStore::new(dir.path());

    let _dev = store.lock_app("env_dev").await.unwrap();
    let other = tokio::time::timeout(Duration::from_secs(5), store.lock_app("env_prod"))
        .await
        .expect("unrelated app must not wait");
    assert!(other.is_ok());

    let err = store.lock_app("../env").await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidRecord { .. }));
}
