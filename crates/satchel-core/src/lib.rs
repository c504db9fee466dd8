// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Satchel data-access toolkit.
//!
//! This crate provides the error taxonomy, the execution-context identity
//! value, the account entity types, and the repository contract shared by
//! the rest of the workspace. It has no knowledge of the storage backend.

pub mod context;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use context::ExecutionContext;
pub use error::SatchelError;
pub use traits::AccountStore;
pub use types::{Account, AccountId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn satchel_error_has_all_variants() {
        // Verify all 6 error variants exist and can be constructed.
        let _acquisition = SatchelError::ConnectionAcquisition {
            source: Box::new(std::io::Error::other("test")),
        };
        let _exhausted = SatchelError::PoolExhausted {
            waited: std::time::Duration::from_secs(5),
        };
        let _statement = SatchelError::StatementExecution {
            source: Box::new(std::io::Error::other("test")),
        };
        let _not_found = SatchelError::NotFound {
            entity: "account",
            id: "a-1".into(),
        };
        let _already_active = SatchelError::TransactionAlreadyActive {
            context: ExecutionContext::named("ctx-1"),
        };
        let _boundary = SatchelError::TransactionBoundary {
            operation: "commit",
            source: Box::new(std::io::Error::other("test")),
        };
    }

    #[test]
    fn account_serialization_round_trips() {
        let account = Account {
            id: AccountId("a-1".into()),
            balance: 100,
        };
        let json = serde_json::to_string(&account).expect("should serialize");
        let parsed: Account = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(account, parsed);
    }

    #[test]
    fn execution_contexts_are_distinct() {
        let a = ExecutionContext::new();
        let b = ExecutionContext::new();
        assert_ne!(a, b);

        // Clones compare equal and hash identically as map keys.
        let a2 = a.clone();
        assert_eq!(a, a2);
    }
}
