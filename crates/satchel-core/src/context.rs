// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution-context identity.
//!
//! An [`ExecutionContext`] identifies one logical caller (a request, a task)
//! for the lifetime of a unit of work. It is passed explicitly through every
//! repository and coordinator call and used only as a binding key; there is
//! deliberately no thread-local or other ambient lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one concurrent logical caller.
///
/// Cheap to clone, hashable, and stable for the lifetime of the unit of
/// work. Two contexts never share a bound connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionContext(String);

impl ExecutionContext {
    /// Create a fresh context with a random unique identity.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Create a context with a fixed name. Useful in tests and logs where a
    /// recognizable identity beats a random one.
    pub fn named(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The underlying identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
