// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as a non-empty database path and a usable pool size.

use crate::diagnostic::ConfigError;
use crate::model::SatchelConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SatchelConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.path must not be empty".to_string(),
        });
    }

    if config.pool.max_size < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "pool.max_size must be at least 1, got {}",
                config.pool.max_size
            ),
        });
    }

    if config.pool.acquire_timeout_ms < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "pool.acquire_timeout_ms must be at least 1, got {}",
                config.pool.acquire_timeout_ms
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
