//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use schoolsync::config::Config;
use schoolsync::domain::{Teacher, TeacherStatus};
use schoolsync::service::{seed, MockService};
use schoolsync::sync::{SyncOptions, SyncStore};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub type TeacherStore = SyncStore<Teacher, MockService<Teacher>>;

/// Default config with no simulated latency.
pub fn quiet_config() -> Config {
    let mut config = Config::default();
    config.service.latency_ms = 0;
    config
}

/// Three active teachers from the seed data.
pub fn three_teachers() -> Vec<Teacher> {
    seed::teachers()
        .into_iter()
        .filter(|t| t.status != TeacherStatus::Inactive)
        .take(3)
        .collect()
}

/// Teacher store over `records` with instant responses.
pub fn teacher_store(records: Vec<Teacher>, options: SyncOptions) -> (MockService<Teacher>, TeacherStore) {
    let service = MockService::new(records, Duration::ZERO);
    let store = SyncStore::new(service.clone(), options);
    (service, store)
}

/// Options with stale-response discarding switched on or off.
pub fn options(discard_stale_responses: bool) -> SyncOptions {
    SyncOptions {
        discard_stale_responses,
        ..SyncOptions::default()
    }
}

/// Write `content` to a config file in a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
