//! Hosts opened from a project directory

use crate::common::*;
use hotkeep::CONFIG_FILE_NAME;
use tempfile::TempDir;

#[test]
fn open_writes_default_config() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let host = ModuleHost::open(dir.path()).unwrap();

    let written = std::fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(written, HostConfig::default_toml());
    assert!(host.load("app").is_hot());
}

#[test]
fn custom_namespace_still_hands_off() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = HostConfig {
        hot: true,
        handoff_namespace: "__custom__".to_string(),
    };
    config.write_to_file(&dir.path().join(CONFIG_FILE_NAME)).unwrap();

    let host = ModuleHost::open(dir.path()).unwrap();
    let g1 = host.load("app");
    assert_eq!(g1.namespace(), "__custom__");
    persist_value(&g1, || Value::from("kept"), "k").unwrap();

    let g2 = reload(&host, &g1);
    assert_eq!(persist_value(&g2, || Value::Null, "k").unwrap(), Value::from("kept"));
}

#[test]
fn cold_config_disables_reloads() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "hot = false\n").unwrap();

    let host = ModuleHost::open(dir.path()).unwrap();
    let generation = host.load("app");
    assert!(generation.channel().is_none());
    assert!(matches!(host.reload(&generation), Err(Error::NotReloadable(_))));
}

#[test]
fn malformed_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "hot = [\n").unwrap();
    assert!(matches!(ModuleHost::open(dir.path()), Err(Error::Config(_))));
}
