//! Testing utilities for the ncconf workspace
//!
//! Shared fixtures: tree builders, seeded stores, fake installations.

#![allow(missing_docs)]

use std::path::Path;

use ncconf_core::{tree_from_json, ConfigTree, Operation};
use ncconf_occ::MemoryStore;
use serde_json::Value;

/// Build a tree from a `json!` literal
pub fn tree(value: Value) -> ConfigTree {
    tree_from_json(value).unwrap()
}

/// In-memory store seeded from a `json!` literal
pub fn memory_store(observed: Value) -> MemoryStore {
    MemoryStore::new(tree(observed))
}

/// Apply operations to a copy of `observed`
pub fn apply_all(observed: &ConfigTree, operations: &[Operation]) -> ConfigTree {
    let mut next = observed.clone();
    for op in operations {
        op.apply_to(&mut next);
    }
    next
}

/// A realistic `system` section as listed by occ
pub fn sample_system() -> Value {
    serde_json::json!({
        "instanceid": "oc8x2k1l9a",
        "passwordsalt": "***REMOVED SENSITIVE VALUE***",
        "trusted_domains": ["localhost", "cloud.example.org"],
        "datadirectory": "/var/www/nextcloud/data",
        "dbtype": "mysql",
        "version": "27.1.3.2",
        "overwrite.cli.url": "https://cloud.example.org",
        "maintenance": false,
        "loglevel": 2,
        "redis": {"host": "localhost", "port": 6379},
        "memcache.local": "\\OC\\Memcache\\APCu"
    })
}

/// Full `config:list` output wrapping `system`
pub fn listing(system: &Value) -> String {
    serde_json::json!({"system": system, "apps": {"core": {"installedat": "1700000000"}}}).to_string()
}

/// Temporary directory containing an `occ` file
pub fn fake_install() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_occ(dir.path());
    dir
}

fn write_occ(dir: &Path) {
    std::fs::write(dir.join("occ"), "#!/usr/bin/env php\n<?php\n").unwrap();
}
