// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./satchel.toml` > `~/.config/satchel/satchel.toml`
//! > `/etc/satchel/satchel.toml`, with environment variable overrides via the
//! `SATCHEL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SatchelConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/satchel/satchel.toml` (system-wide)
/// 3. `~/.config/satchel/satchel.toml` (user XDG config)
/// 4. `./satchel.toml` (local directory)
/// 5. `SATCHEL_*` environment variables
pub fn load_config() -> Result<SatchelConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SatchelConfig::default()))
        .merge(Toml::file("/etc/satchel/satchel.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("satchel/satchel.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("satchel.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file or env lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<SatchelConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SatchelConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SatchelConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SatchelConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing
/// key names stay unambiguous: `SATCHEL_POOL_ACQUIRE_TIMEOUT_MS` must map to
/// `pool.acquire_timeout_ms`, not `pool.acquire.timeout.ms`.
fn env_provider() -> Env {
    Env::prefixed("SATCHEL_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        // Example: SATCHEL_POOL_MAX_SIZE -> "pool_max_size"
        let mapped = key
            .as_str()
            .replacen("storage_", "storage.", 1)
            .replacen("pool_", "pool.", 1);
        mapped.into()
    })
}
