// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Satchel data-access toolkit.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup instead of silently ignoring them.

use serde::{Deserialize, Serialize};

/// Top-level Satchel configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SatchelConfig {
    /// Database file settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Connection pool settings.
    #[serde(default)]
    pub pool: PoolConfig,
}

/// Database file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Whether to run SQLite in WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "satchel.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Connection pool configuration.
///
/// The pool is fixed-size: `max_size` connections are opened at construction
/// and never grown.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PoolConfig {
    /// Number of physical connections in the pool. Must be at least 1.
    #[serde(default = "default_max_size")]
    pub max_size: usize,

    /// How long `acquire` waits for an idle connection before failing,
    /// in milliseconds.
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
        }
    }
}

fn default_max_size() -> usize {
    4
}

fn default_acquire_timeout_ms() -> u64 {
    5_000
}
