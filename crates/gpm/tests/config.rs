#![cfg(feature = "config")]

use gpm::config::{RegistryConfig, load_config, load_registry};
use gpm::prelude::*;
use std::fs;
use tempfile::tempdir;

const SEED: &str = r#"
[groups.write]
key = 0
permissions = 1

[groups.read]
key = 1
bits = [0, 1]
"#;

#[test]
fn loads_registry_from_toml_seed() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("permissions.toml");
    fs::write(&path, SEED).expect("write seed");

    let registry = load_registry(Some(&path)).expect("seed should load");

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.get(GroupKey::new(0)), Permission::from(0b01));
    assert_eq!(registry.get(GroupKey::new(1)), Permission::from(0b11));
    assert!(!registry.allows(GroupKey::new(0), Permission::from(0b11)));
}

#[test]
fn loads_json_seed_with_names() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("seed.json");
    fs::write(&path, r#"{ "groups": { "admin": { "key": 7, "permissions": 12 } } }"#)
        .expect("write seed");

    let config: RegistryConfig = load_config(Some(&path)).expect("seed should load");

    assert_eq!(config.groups.len(), 1);
    assert_eq!(config.groups["admin"].key, GroupKey::new(7));
    assert_eq!(config.groups["admin"].permission().unwrap(), Permission::from(0b1100));
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let err = load_registry(Some(&path)).unwrap_err();
    assert!(matches!(err, RegistryError::Config { .. }));
}

#[test]
fn invalid_bit_in_seed_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("permissions.toml");
    fs::write(&path, "[groups.audit]\nkey = 3\nbits = [70]\n").expect("write seed");

    let err = load_registry(Some(&path)).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidBit { bit: 70, .. }));
}

#[test]
fn array_of_groups_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("permissions.toml");
    fs::write(&path, "[[groups]]\nkey = 0\npermissions = 1\n").expect("write seed");

    let err = load_registry(Some(&path)).unwrap_err();
    assert!(matches!(err, RegistryError::Config { .. }));
}
