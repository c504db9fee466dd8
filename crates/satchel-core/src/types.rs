// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity types shared across the repository contract and its backends.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A money-holding account: one row in the `accounts` table.
///
/// Balance is stored in minor units as a plain integer; monetary semantics
/// beyond that (currency, scale) are out of scope here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub balance: i64,
}

impl Account {
    pub fn new(id: impl Into<AccountId>, balance: i64) -> Self {
        Self {
            id: id.into(),
            balance,
        }
    }
}
