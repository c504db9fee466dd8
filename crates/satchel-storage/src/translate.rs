// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation of backend failures into the [`SatchelError`] taxonomy.
//!
//! Applied at the repository/coordinator boundary only: code above that
//! boundary works exclusively with [`SatchelError`] and never sees
//! `rusqlite::Error` directly. Every constructor keeps the original failure
//! as the error source.

use satchel_core::SatchelError;

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// A connection could not be opened or prepared for use.
pub fn acquisition(err: impl Into<Cause>) -> SatchelError {
    SatchelError::ConnectionAcquisition { source: err.into() }
}

/// The backend rejected a statement issued by a repository operation.
pub fn statement(err: impl Into<Cause>) -> SatchelError {
    SatchelError::StatementExecution { source: err.into() }
}

/// A transaction boundary operation (`begin`, `commit`) failed.
pub fn boundary(operation: &'static str, err: impl Into<Cause>) -> SatchelError {
    SatchelError::TransactionBoundary {
        operation,
        source: err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn statement_translation_preserves_the_rusqlite_cause() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let backend_err = conn
            .execute("INSERT INTO missing_table VALUES (1)", [])
            .unwrap_err();
        let original = backend_err.to_string();

        let translated = statement(backend_err);
        assert!(matches!(
            translated,
            SatchelError::StatementExecution { .. }
        ));
        let source = translated.source().expect("cause must be preserved");
        assert_eq!(source.to_string(), original);
    }

    #[test]
    fn boundary_translation_accepts_plain_messages() {
        let err = boundary("commit", "no active transaction for context req-1");
        assert!(err.to_string().starts_with("transaction commit failed"));
        assert!(err.source().is_some());
    }
}
